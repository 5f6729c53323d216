pub mod engine;
pub mod lines;
pub mod message;
pub mod notes;
pub mod octave;
pub mod setup;

/// Nominal scan period of the switch matrix, in milliseconds
pub const TICK_MS: u16 = 10;

/// Settle delay added after function-mode transitions and commands
pub const SETTLE_MS: u16 = 10;

/// Hold duration at which releasing an octave button reverts the shift
pub const LONG_PRESS_MS: u16 = 200;

/// Octave shift bounds, in octaves (applies on every channel)
pub const SHIFT_MIN: i8 = -5;
pub const SHIFT_MAX: i8 = 3;

/// Number of key lines in the matrix
pub const NUM_KEYS: usize = 12;

/// Highest MIDI channel index
pub const MAX_CHANNEL: u8 = 15;

/// Velocity carried by every Note On
pub const NOTE_ON_VELOCITY: u8 = 127;

/// MIDI serial line rate: 31,250 bps, 8 data bits, no parity
pub const MIDI_BAUD_BPS: u32 = 31_250;
