//! Virtual-clock replay: feeds a scripted timeline through the engine at
//! the scan cadence, honoring the settle time each tick reports.

use anyhow::Result;
use keybed_engine::engine::Engine;
use keybed_engine::lines::SwitchSnapshot;
use keybed_engine::message::MemorySink;
use tracing::debug;

use crate::script::{Action, Script};

/// One emitted MIDI message with its virtual-time stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub at_ms: u64,
    pub bytes: Vec<u8>,
}

/// Replay summary.
#[derive(Debug)]
pub struct Report {
    pub messages: Vec<Emitted>,
    pub ticks: u64,
    pub elapsed_ms: u64,
    pub final_channel: u8,
    pub final_shift: i8,
    /// Keys still sounding when the script ran out
    pub hanging_notes: usize,
}

impl Report {
    /// Raw byte stream as it would appear on the serial line.
    pub fn raw_stream(&self) -> Vec<u8> {
        self.messages
            .iter()
            .flat_map(|m| m.bytes.iter().copied())
            .collect()
    }
}

pub fn run(script: &Script, until_ms: Option<u64>) -> Result<Report> {
    let mut events = script.events.clone();
    events.sort_by_key(|e| e.at_ms);

    let tick_ms = script.setup.tick_ms.max(1) as u64;
    let end_ms = until_ms
        .unwrap_or_else(|| events.last().map(|e| e.at_ms).unwrap_or(0) + 2 * tick_ms);

    let mut engine = Engine::new(script.setup.channel_select);
    let mut sink = MemorySink::new();
    let mut lines = SwitchSnapshot::default();
    let mut messages = Vec::new();

    let mut now_ms = 0u64;
    let mut ticks = 0u64;
    let mut next_event = 0usize;

    while now_ms <= end_ms {
        // Apply every line change due by now; a settle delay can make a
        // tick late, in which case the changes pile onto one sample, the
        // same way a blocked firmware loop would see them.
        while next_event < events.len() && events[next_event].at_ms <= now_ms {
            let event = events[next_event];
            event.line.apply(&mut lines, event.action == Action::Press);
            debug!(at_ms = now_ms, line = ?event.line, action = ?event.action, "line change");
            next_event += 1;
        }

        let tick = engine.tick(lines, &mut sink)?;
        for bytes in sink.take() {
            messages.push(Emitted { at_ms: now_ms, bytes });
        }

        ticks += 1;
        now_ms += tick_ms + tick.settle_ms as u64;
    }

    Ok(Report {
        messages,
        ticks,
        elapsed_ms: now_ms,
        final_channel: engine.channel(),
        final_shift: engine.shift(),
        hanging_notes: engine.active_note_count(),
    })
}
