//! Octave and function-key controller.
//!
//! Owns the octave shift, the per-button press trackers, and the
//! function-mode flag. Runs before the note tracker each tick and may
//! emit Program Change messages through the sink.

use crate::lines::{pressed_edge, released_edge, Key, SwitchSnapshot};
use crate::message::{self, MidiSink};
use crate::setup::ChannelConfig;
use crate::{LONG_PRESS_MS, MAX_CHANNEL, SETTLE_MS, SHIFT_MAX, SHIFT_MIN, TICK_MS};

/// What the controller did with this tick's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEffect {
    /// Nothing beyond routine button tracking.
    None,
    /// Percussion lock: octave-button input ignored, shift forced to 0.
    /// Key lines still sound notes this tick.
    Suppressed,
    /// Function mode dispatched at least one command.
    CommandsIssued,
}

/// Press-tracking record for one octave button.
#[derive(Debug, Clone, Copy, Default)]
struct ButtonTracker {
    pressed: bool,
    held_ms: u16,
    /// Shift to restore on a long-press release. Meaningful only while
    /// `pressed`.
    shift_before_press: i8,
}

impl ButtonTracker {
    fn clear(&mut self) {
        *self = Self::default();
    }

    /// One tick of press/hold/release tracking for this button.
    ///
    /// The shift applies at press time: a tap keeps it, a hold of
    /// `LONG_PRESS_MS` or more reverts to the pre-press value on release.
    fn step(&mut self, shift: &mut i8, delta: i8, prev: bool, curr: bool) {
        if pressed_edge(prev, curr) {
            self.pressed = true;
            self.held_ms = 0;
            self.shift_before_press = *shift;
            *shift = (*shift + delta).clamp(SHIFT_MIN, SHIFT_MAX);
        } else if released_edge(prev, curr) && self.pressed {
            if self.held_ms >= LONG_PRESS_MS {
                *shift = self.shift_before_press;
            }
            self.pressed = false;
        } else if self.pressed {
            self.held_ms = self.held_ms.saturating_add(TICK_MS);
        }
    }
}

#[derive(Debug, Default)]
pub struct OctaveController {
    shift: i8,
    function_mode: bool,
    up: ButtonTracker,
    down: ButtonTracker,
}

impl OctaveController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current octave shift, in octaves
    pub fn shift(&self) -> i8 {
        self.shift
    }

    /// Whether the key lines are currently commands rather than notes
    pub fn function_mode(&self) -> bool {
        self.function_mode
    }

    /// Process octave-button and function-mode input for one tick.
    ///
    /// Returns the effect plus settle time the caller must insert before
    /// the next sample (debounce after mode transitions and commands).
    pub fn tick(
        &mut self,
        prev: &SwitchSnapshot,
        curr: &SwitchSnapshot,
        config: &mut ChannelConfig,
        sink: &mut dyn MidiSink,
    ) -> anyhow::Result<(ControllerEffect, u16)> {
        // Channel 10 with the mode line held forbids transposition.
        if config.channel == 9 && curr.mode {
            self.shift = 0;
            self.function_mode = false;
            self.up.clear();
            self.down.clear();
            return Ok((ControllerEffect::Suppressed, 0));
        }

        let mut settle_ms = 0u16;

        // Function mode enters when both buttons land together and exits
        // when either lifts. Both transitions restart button tracking.
        let both_now = curr.up && curr.down;
        let both_before = prev.up && prev.down;
        if both_now && !both_before {
            self.function_mode = true;
            self.up.clear();
            self.down.clear();
            settle_ms += SETTLE_MS;
            tracing::debug!("function mode entered");
        } else if self.function_mode && !both_now {
            self.function_mode = false;
            self.up.clear();
            self.down.clear();
            settle_ms += SETTLE_MS;
            tracing::debug!("function mode exited");
        }

        if self.function_mode {
            let fired = self.dispatch_commands(prev, curr, config, sink, &mut settle_ms)?;
            let effect = if fired {
                ControllerEffect::CommandsIssued
            } else {
                ControllerEffect::None
            };
            return Ok((effect, settle_ms));
        }

        self.up.step(&mut self.shift, 1, prev.up, curr.up);
        self.down.step(&mut self.shift, -1, prev.down, curr.down);

        Ok((ControllerEffect::None, settle_ms))
    }

    /// One-shot commands on key-line press edges while function mode is
    /// active. Each fired command adds a settle delay.
    fn dispatch_commands(
        &self,
        prev: &SwitchSnapshot,
        curr: &SwitchSnapshot,
        config: &mut ChannelConfig,
        sink: &mut dyn MidiSink,
        settle_ms: &mut u16,
    ) -> anyhow::Result<bool> {
        let mut fired = false;
        for key in Key::ALL {
            if !pressed_edge(prev.key(key), curr.key(key)) {
                continue;
            }
            match key {
                // Channel 1 preset restores the middle-C layout
                Key::Cs => {
                    config.channel = 0;
                    config.base_note = 60;
                    tracing::debug!(channel = config.channel, "channel preset");
                }
                // Channel 10 preset keeps the current base note
                Key::Ds => {
                    config.channel = 9;
                    tracing::debug!(channel = config.channel, "channel preset");
                }
                Key::Fs => {
                    config.channel = config.channel.saturating_sub(1);
                    tracing::debug!(channel = config.channel, "channel down");
                }
                Key::As => {
                    if config.channel < MAX_CHANNEL {
                        config.channel += 1;
                    }
                    tracing::debug!(channel = config.channel, "channel up");
                }
                Key::C => self.program_change(config, 0, sink)?,
                Key::D => self.program_change(config, 10, sink)?,
                Key::A => self.program_change(config, 87, sink)?,
                Key::B => self.program_change(config, 80, sink)?,
                _ => continue,
            }
            fired = true;
            *settle_ms += SETTLE_MS;
        }
        Ok(fired)
    }

    fn program_change(
        &self,
        config: &ChannelConfig,
        program: u8,
        sink: &mut dyn MidiSink,
    ) -> anyhow::Result<()> {
        sink.send(&message::program_change(config.channel, program))?;
        tracing::debug!(channel = config.channel, program, "program change");
        Ok(())
    }
}
