//! Human-readable rendering of the emitted MIDI stream.

use keybed_engine::lines::Key;

/// Decode one message into a short description. Channels print 1-based,
/// the way they appear on instrument panels.
pub fn describe(bytes: &[u8]) -> String {
    match bytes {
        [status, note, velocity] if status & 0xF0 == 0x90 => format!(
            "Note On   ch {:>2}  note {:>3}  vel {:>3}",
            (status & 0x0F) + 1,
            note,
            velocity
        ),
        [status, note, _] if status & 0xF0 == 0x80 => format!(
            "Note Off  ch {:>2}  note {:>3}",
            (status & 0x0F) + 1,
            note
        ),
        [status, program] if status & 0xF0 == 0xC0 => format!(
            "Prog Chg  ch {:>2}  program {:>3}",
            (status & 0x0F) + 1,
            program
        ),
        other => format!("Unknown   {:02X?}", other),
    }
}

pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print the key-line map and the function-mode command table.
pub fn print_key_map() {
    println!("Key lines (semitone offset from the base note)");
    println!("══════════════════════════════");
    for key in Key::ALL {
        println!("  {:<2} offset {:>2}", key.name(), key.offset());
    }
    println!();
    println!("Function mode (hold both octave buttons)");
    println!("══════════════════════════════");
    println!("  C#  channel 1 preset (base note 60)");
    println!("  D#  channel 10 preset (base note kept)");
    println!("  F#  channel down (floor 1)");
    println!("  A#  channel up (ceiling 16)");
    println!("  C   Program Change 0 (piano)");
    println!("  D   Program Change 10 (music box)");
    println!("  A   Program Change 87");
    println!("  B   Program Change 80");
}
