/// MIDI channel and base note, fixed at boot from the channel-select line.
///
/// Mutable afterward only through function-mode commands: the channel
/// presets and increments, and `base_note` only as a side effect of the
/// channel-1 preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// MIDI channel index (0-15)
    pub channel: u8,
    /// Note number of the lowest key line
    pub base_note: u8,
}

impl ChannelConfig {
    /// One-time boot read of the channel-select line.
    ///
    /// Asserted (switch grounds the line) selects GM channel 1 at middle
    /// C; open selects GM channel 10 with the keybed two octaves lower,
    /// the percussion convention.
    pub fn from_select_line(asserted: bool) -> Self {
        if asserted {
            Self {
                channel: 0,
                base_note: 60,
            }
        } else {
            Self {
                channel: 9,
                base_note: 36,
            }
        }
    }
}
