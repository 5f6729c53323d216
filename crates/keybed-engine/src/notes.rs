//! Note lifecycle tracker.
//!
//! One slot per key line. The defining invariant: a Note Off is computed
//! from the octave shift captured at Note On, never from the live shift,
//! so a key held across an octave change releases on the pitch it was
//! struck with.

use crate::lines::{pressed_edge, released_edge, SwitchSnapshot};
use crate::message::{self, MidiSink};
use crate::setup::ChannelConfig;
use crate::{NOTE_ON_VELOCITY, NUM_KEYS};

#[derive(Debug, Clone, Copy, Default)]
struct NoteSlot {
    active: bool,
    /// Octave shift at Note On. Meaningful only while `active`.
    shift_at_press: i8,
}

#[derive(Debug, Default)]
pub struct NoteTracker {
    slots: [NoteSlot; NUM_KEYS],
}

impl NoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently sounding
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    /// Scan the key lines for one tick.
    ///
    /// Notes outside 0-127 are dropped silently; an out-of-range press
    /// never arms the slot, so no orphan Note Off can fire later.
    pub fn tick(
        &mut self,
        prev: &SwitchSnapshot,
        curr: &SwitchSnapshot,
        shift: i8,
        config: &ChannelConfig,
        sink: &mut dyn MidiSink,
    ) -> anyhow::Result<()> {
        for (offset, slot) in self.slots.iter_mut().enumerate() {
            let was = prev.keys[offset];
            let is = curr.keys[offset];

            if pressed_edge(was, is) {
                let note = note_number(config.base_note, offset, shift);
                if let Some(note) = note {
                    sink.send(&message::note_on(config.channel, note, NOTE_ON_VELOCITY))?;
                    slot.active = true;
                    slot.shift_at_press = shift;
                }
            } else if released_edge(was, is) && slot.active {
                if let Some(note) = note_number(config.base_note, offset, slot.shift_at_press) {
                    sink.send(&message::note_off(config.channel, note))?;
                }
                slot.active = false;
            }
        }
        Ok(())
    }
}

/// `base + offset + shift*12`, or None when outside the MIDI note range.
fn note_number(base_note: u8, offset: usize, shift: i8) -> Option<u8> {
    let note = base_note as i16 + offset as i16 + shift as i16 * 12;
    if (0..=127).contains(&note) {
        Some(note as u8)
    } else {
        None
    }
}
