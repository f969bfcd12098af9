//! Line buffering for `text/event-stream` response bodies.
//!
//! Network chunks do not line up with SSE lines: one chunk may carry several
//! events, and one `data:` line may be split across chunks. The buffer keeps
//! the trailing partial line until its newline arrives. Bytes are decoded
//! only once a line is complete, so a multi-byte character split between
//! chunks survives intact.

use std::mem;

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Data(String),
    Done,
}

#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a network chunk and returns the events of every completed line.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(event) = parse_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    /// Parses whatever is left once the body ends without a final newline.
    pub fn flush(&mut self) -> Option<SseEvent> {
        let rest = mem::take(&mut self.pending);
        parse_line(&String::from_utf8_lossy(&rest))
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let line = line.trim();
    // blank separators, comments and non-data fields
    let data = line.strip_prefix(DATA_PREFIX)?.trim();
    if data.is_empty() {
        return None;
    }
    if data == DONE_SENTINEL {
        return Some(SseEvent::Done);
    }
    Some(SseEvent::Data(data.to_string()))
}
