//! Tick orchestration: one owned value wiring the channel config, the
//! octave controller, and the note tracker behind a single entry point.
//!
//! The caller samples the switch lines at a stable cadence (nominally
//! `TICK_MS`) and hands each snapshot to `tick`, adding the returned
//! settle time before the next sample.

use crate::lines::{LineSampler, SwitchSnapshot};
use crate::message::MidiSink;
use crate::notes::NoteTracker;
use crate::octave::{ControllerEffect, OctaveController};
use crate::setup::ChannelConfig;

/// Result of one engine tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub effect: ControllerEffect,
    /// Settle time to insert before the next sample, on top of the
    /// nominal scan period.
    pub settle_ms: u16,
}

#[derive(Debug)]
pub struct Engine {
    config: ChannelConfig,
    octave: OctaveController,
    notes: NoteTracker,
    prev: SwitchSnapshot,
}

impl Engine {
    /// Boot-time construction. The channel-select line is read exactly
    /// once; it has no effect after this point.
    pub fn new(channel_select_asserted: bool) -> Self {
        Self {
            config: ChannelConfig::from_select_line(channel_select_asserted),
            octave: OctaveController::new(),
            notes: NoteTracker::new(),
            prev: SwitchSnapshot::default(),
        }
    }

    /// Boot against a live sampler: one sample decides the channel layout.
    pub fn from_sampler(sampler: &mut dyn LineSampler) -> Self {
        Self::new(sampler.sample().channel_select)
    }

    /// Process one snapshot of the switch lines.
    ///
    /// The controller runs first and may reinterpret the key lines as
    /// commands; the note tracker then runs unless function mode claimed
    /// the keys this tick (on entry, during, and on the exit tick — a key
    /// edge that arrives alongside a mode transition is never a note).
    /// Percussion lock suppresses only the octave buttons, so notes still
    /// sound under it.
    pub fn tick(&mut self, snapshot: SwitchSnapshot, sink: &mut dyn MidiSink) -> anyhow::Result<Tick> {
        let in_function_before = self.octave.function_mode();
        let (effect, settle_ms) = self
            .octave
            .tick(&self.prev, &snapshot, &mut self.config, sink)?;

        let keys_are_commands = in_function_before || self.octave.function_mode();
        if effect == ControllerEffect::Suppressed || !keys_are_commands {
            self.notes.tick(
                &self.prev,
                &snapshot,
                self.octave.shift(),
                &self.config,
                sink,
            )?;
        }

        self.prev = snapshot;
        Ok(Tick { effect, settle_ms })
    }

    pub fn shift(&self) -> i8 {
        self.octave.shift()
    }

    pub fn channel(&self) -> u8 {
        self.config.channel
    }

    pub fn base_note(&self) -> u8 {
        self.config.base_note
    }

    pub fn function_mode(&self) -> bool {
        self.octave.function_mode()
    }

    pub fn active_note_count(&self) -> usize {
        self.notes.active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::Key;
    use crate::message::MemorySink;

    #[test]
    fn boot_reads_select_line_once() {
        let engine = Engine::new(true);
        assert_eq!(engine.channel(), 0);
        assert_eq!(engine.base_note(), 60);

        let engine = Engine::new(false);
        assert_eq!(engine.channel(), 9);
        assert_eq!(engine.base_note(), 36);
    }

    #[test]
    fn from_sampler_uses_first_sample() {
        struct Fixed(SwitchSnapshot);
        impl LineSampler for Fixed {
            fn sample(&mut self) -> SwitchSnapshot {
                self.0
            }
        }

        let mut sampler = Fixed(SwitchSnapshot {
            channel_select: true,
            ..Default::default()
        });
        let engine = Engine::from_sampler(&mut sampler);
        assert_eq!(engine.channel(), 0);
    }

    #[test]
    fn controller_shift_feeds_note_pitch() {
        let mut engine = Engine::new(true);
        let mut sink = MemorySink::new();

        // Tap Up: shift 1
        let up = SwitchSnapshot {
            up: true,
            ..Default::default()
        };
        engine.tick(up, &mut sink).unwrap();
        engine.tick(SwitchSnapshot::default(), &mut sink).unwrap();
        assert_eq!(engine.shift(), 1);

        let mut pressed = SwitchSnapshot::default();
        pressed.set_key(Key::D, true);
        engine.tick(pressed, &mut sink).unwrap();
        // 60 + 2 + 12 = 74
        assert_eq!(*sink.messages().last().unwrap(), vec![0x90, 74, 127]);
    }

    #[test]
    fn function_mode_claims_key_lines() {
        let mut engine = Engine::new(true);
        let mut sink = MemorySink::new();

        let both = SwitchSnapshot {
            up: true,
            down: true,
            ..Default::default()
        };
        engine.tick(both, &mut sink).unwrap();
        assert!(engine.function_mode());

        // A# is a command, not a note
        let mut pressed = both;
        pressed.set_key(Key::As, true);
        let tick = engine.tick(pressed, &mut sink).unwrap();
        assert_eq!(tick.effect, ControllerEffect::CommandsIssued);
        assert_eq!(engine.channel(), 1);
        assert!(sink.is_empty());
        assert_eq!(engine.active_note_count(), 0);
    }

    #[test]
    fn command_key_on_entry_tick_does_not_sound() {
        let mut engine = Engine::new(true);
        let mut sink = MemorySink::new();

        // Both buttons and a key land on the same tick
        let mut snap = SwitchSnapshot {
            up: true,
            down: true,
            ..Default::default()
        };
        snap.set_key(Key::C, true);
        let tick = engine.tick(snap, &mut sink).unwrap();

        assert_eq!(tick.effect, ControllerEffect::CommandsIssued);
        // Only the Program Change went out, no Note On
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.messages()[0], vec![0xC0, 0]);
        assert_eq!(engine.active_note_count(), 0);
    }

    #[test]
    fn key_edge_on_exit_tick_is_ignored() {
        let mut engine = Engine::new(true);
        let mut sink = MemorySink::new();

        let both = SwitchSnapshot {
            up: true,
            down: true,
            ..Default::default()
        };
        engine.tick(both, &mut sink).unwrap();

        // Releasing Down and pressing a key on the same tick: the key is
        // neither a command (mode just ended) nor a note (prior tick was
        // still function mode).
        let mut snap = SwitchSnapshot {
            up: true,
            down: false,
            ..Default::default()
        };
        snap.set_key(Key::E, true);
        engine.tick(snap, &mut sink).unwrap();
        assert!(!engine.function_mode());
        assert!(sink.is_empty());

        // Next tick the key is plain held state, not an edge
        engine.tick(snap, &mut sink).unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn percussion_lock_still_sounds_notes() {
        let mut engine = Engine::new(false); // channel 10
        let mut sink = MemorySink::new();

        let mut snap = SwitchSnapshot {
            mode: true,
            up: true, // dead under the lock
            ..Default::default()
        };
        snap.set_key(Key::C, true);
        let tick = engine.tick(snap, &mut sink).unwrap();

        assert_eq!(tick.effect, ControllerEffect::Suppressed);
        assert_eq!(engine.shift(), 0);
        assert_eq!(*sink.messages().last().unwrap(), vec![0x99, 36, 127]);
    }
}
