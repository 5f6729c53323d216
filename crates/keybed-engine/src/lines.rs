use serde::Deserialize;

use crate::NUM_KEYS;

/// The 12 key lines of the switch matrix, ordered low to high.
/// `offset()` is the semitone distance from the base note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Key {
    pub const ALL: [Key; NUM_KEYS] = [
        Key::C,
        Key::Cs,
        Key::D,
        Key::Ds,
        Key::E,
        Key::F,
        Key::Fs,
        Key::G,
        Key::Gs,
        Key::A,
        Key::As,
        Key::B,
    ];

    /// Semitone offset from the base note (0-11)
    pub fn offset(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Key::C => "C",
            Key::Cs => "C#",
            Key::D => "D",
            Key::Ds => "D#",
            Key::E => "E",
            Key::F => "F",
            Key::Fs => "F#",
            Key::G => "G",
            Key::Gs => "G#",
            Key::A => "A",
            Key::As => "A#",
            Key::B => "B",
        }
    }
}

/// Boolean state of every switch line, captured fresh each tick.
///
/// `true` means asserted: the line reads logic-low under its internal
/// pull-up because the switch grounds it when pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchSnapshot {
    /// Octave-up button
    pub up: bool,
    /// Octave-down button
    pub down: bool,
    /// Mode line (percussion lock on channel 10)
    pub mode: bool,
    /// Channel-select line, read once at boot
    pub channel_select: bool,
    /// Key lines, indexed by `Key::offset`
    pub keys: [bool; NUM_KEYS],
}

impl SwitchSnapshot {
    pub fn key(&self, key: Key) -> bool {
        self.keys[key.offset()]
    }

    pub fn set_key(&mut self, key: Key, asserted: bool) {
        self.keys[key.offset()] = asserted;
    }
}

/// Source of switch line states. Hardware reads the ports; the simulator
/// replays a scripted timeline. Pure read, no state of its own.
pub trait LineSampler {
    fn sample(&mut self) -> SwitchSnapshot;
}

/// Line transitioned released -> pressed between two consecutive samples.
#[inline]
pub fn pressed_edge(prev: bool, curr: bool) -> bool {
    curr && !prev
}

/// Line transitioned pressed -> released between two consecutive samples.
#[inline]
pub fn released_edge(prev: bool, curr: bool) -> bool {
    !curr && prev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_offsets_are_chromatic() {
        for (i, key) in Key::ALL.iter().enumerate() {
            assert_eq!(key.offset(), i);
        }
        assert_eq!(Key::C.offset(), 0);
        assert_eq!(Key::Fs.offset(), 6);
        assert_eq!(Key::B.offset(), 11);
    }

    #[test]
    fn snapshot_defaults_released() {
        let snap = SwitchSnapshot::default();
        assert!(!snap.up);
        assert!(!snap.down);
        assert!(!snap.mode);
        assert!(!snap.channel_select);
        assert!(snap.keys.iter().all(|&k| !k));
    }

    #[test]
    fn edge_predicates() {
        assert!(pressed_edge(false, true));
        assert!(!pressed_edge(true, true));
        assert!(!pressed_edge(false, false));
        assert!(released_edge(true, false));
        assert!(!released_edge(false, false));
        assert!(!released_edge(true, true));
    }
}
