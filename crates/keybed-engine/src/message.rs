//! MIDI message encoding and the outbound transport seam.
//!
//! The encoders are stateless and perform no validation: channel is
//! pre-clamped to 0-15 and data bytes to 0-127 by the callers. A value out
//! of range here is a caller defect, not a runtime condition.

use std::io::Write;

/// Encode a Note On message.
pub fn note_on(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
    [0x90 | channel, note, velocity]
}

/// Encode a Note Off message (released velocity is always 0).
pub fn note_off(channel: u8, note: u8) -> [u8; 3] {
    [0x80 | channel, note, 0]
}

/// Encode a Program Change message.
pub fn program_change(channel: u8, program: u8) -> [u8; 2] {
    [0xC0 | channel, program]
}

/// Outbound MIDI transport.
///
/// `send` takes a whole message so the transport can keep its bytes
/// together on the wire; no running status, every message goes out in
/// full. Blocking inside `send` is the back-pressure model — there is no
/// timeout or cancellation.
pub trait MidiSink {
    fn send(&mut self, message: &[u8]) -> anyhow::Result<()>;
}

/// Captures emitted messages in memory. Used by tests and the simulator.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Vec<Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Vec<u8>] {
        &self.messages
    }

    /// Take everything captured so far, leaving the sink empty.
    pub fn take(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.messages)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MidiSink for MemorySink {
    fn send(&mut self, message: &[u8]) -> anyhow::Result<()> {
        self.messages.push(message.to_vec());
        Ok(())
    }
}

/// Writes the raw byte stream to any writer, flushing per message.
/// Stands in for the 31,250 baud serial line on a host system.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> MidiSink for WriterSink<W> {
    fn send(&mut self, message: &[u8]) -> anyhow::Result<()> {
        self.inner.write_all(message)?;
        self.inner.flush()?;
        Ok(())
    }
}
