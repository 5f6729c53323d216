//! Script file format: a switch-line timeline the runner replays on a
//! virtual clock.

use std::path::Path;

use anyhow::Context;
use keybed_engine::lines::{Key, SwitchSnapshot};
use keybed_engine::TICK_MS;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub setup: Setup,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Setup {
    /// Channel-select line state at boot (asserted = GM channel 1)
    #[serde(default = "default_channel_select")]
    pub channel_select: bool,
    /// Scan period in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u16,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            channel_select: default_channel_select(),
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_channel_select() -> bool {
    true
}

fn default_tick_ms() -> u16 {
    TICK_MS
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Event {
    /// Virtual time at which the line changes state
    pub at_ms: u64,
    pub line: Line,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Press,
    Release,
}

/// Any of the 14 switch lines addressable from a script: a button line
/// by name, or a key line by note name. The channel-select line is
/// boot-time state, not an event, so it lives in `Setup` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Line {
    Button(Button),
    Key(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Up,
    Down,
    Mode,
}

impl Line {
    pub fn apply(self, lines: &mut SwitchSnapshot, asserted: bool) {
        match self {
            Line::Button(Button::Up) => lines.up = asserted,
            Line::Button(Button::Down) => lines.down = asserted,
            Line::Button(Button::Mode) => lines.mode = asserted,
            Line::Key(key) => lines.set_key(key, asserted),
        }
    }
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {:?}", path))?;
        let script: Script =
            toml::from_str(&text).with_context(|| format!("failed to parse script {:?}", path))?;
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_script() {
        let script: Script = toml::from_str(
            r#"
            [setup]
            channel_select = false
            tick_ms = 10

            [[events]]
            at_ms = 0
            line = "c"
            action = "press"

            [[events]]
            at_ms = 120
            line = "c"
            action = "release"

            [[events]]
            at_ms = 200
            line = "up"
            action = "press"
            "#,
        )
        .unwrap();

        assert!(!script.setup.channel_select);
        assert_eq!(script.events.len(), 3);
        assert_eq!(script.events[0].line, Line::Key(Key::C));
        assert_eq!(script.events[0].action, Action::Press);
        assert_eq!(script.events[2].line, Line::Button(Button::Up));
        assert_eq!(script.events[2].at_ms, 200);
    }

    #[test]
    fn setup_defaults_apply() {
        let script: Script = toml::from_str(
            r#"
            [[events]]
            at_ms = 0
            line = "mode"
            action = "press"
            "#,
        )
        .unwrap();

        assert!(script.setup.channel_select);
        assert_eq!(script.setup.tick_ms, TICK_MS);
    }

    #[test]
    fn sharp_keys_parse() {
        let script: Script = toml::from_str(
            r#"
            [[events]]
            at_ms = 0
            line = "cs"
            action = "press"

            [[events]]
            at_ms = 10
            line = "as"
            action = "press"
            "#,
        )
        .unwrap();
        assert_eq!(script.events[0].line, Line::Key(Key::Cs));
        assert_eq!(script.events[1].line, Line::Key(Key::As));
    }

    #[test]
    fn line_apply_targets_the_right_switch() {
        let mut lines = SwitchSnapshot::default();
        Line::Button(Button::Up).apply(&mut lines, true);
        Line::Key(Key::Gs).apply(&mut lines, true);
        assert!(lines.up);
        assert!(lines.key(Key::Gs));

        Line::Key(Key::Gs).apply(&mut lines, false);
        assert!(!lines.key(Key::Gs));
    }

    #[test]
    fn unknown_line_is_an_error() {
        let result: Result<Script, _> = toml::from_str(
            r#"
            [[events]]
            at_ms = 0
            line = "pedal"
            action = "press"
            "#,
        );
        assert!(result.is_err());
    }
}
