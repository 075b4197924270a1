use std::collections::VecDeque;

use log::debug;

use crate::types::Reading;

/// Unterminated input beyond this many bytes is dropped.
pub const MAX_PENDING_BYTES: usize = 1024;

/// Parses a `"<x>,<y>,<z>"` payload.
///
/// Returns `None` unless there are exactly three finite numeric fields.
pub fn parse_reading(payload: &str) -> Option<Reading> {
    let mut fields = payload.trim().split(',');
    let x = parse_field(fields.next()?)?;
    let y = parse_field(fields.next()?)?;
    let z = parse_field(fields.next()?)?;
    if fields.next().is_some() {
        return None;
    }
    Some(Reading::new(x, y, z))
}

fn parse_field(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Splits the device byte stream into readings.
///
/// Every newline-terminated line is one message. Devices that write one
/// message per packet without a terminator are also handled: until the
/// first newline shows up on the stream, a chunk that parses as a full
/// reading is taken as is. After that only complete lines count, so a line
/// split across reads is never cut short. Anything that does not parse is
/// dropped.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
    ready: VecDeque<Reading>,
    dropped: u64,
    seen_newline: bool,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.seen_newline |= chunk.contains(&b'\n');
        self.pending.extend_from_slice(chunk);

        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.accept(&line);
        }

        if !self.seen_newline && !self.pending.is_empty() {
            if let Some(reading) = decode(&self.pending) {
                self.ready.push_back(reading);
                self.pending.clear();
            }
        }

        if self.pending.len() > MAX_PENDING_BYTES {
            debug!("Dropping {} bytes of unterminated input", self.pending.len());
            self.pending.clear();
            self.dropped += 1;
        }
    }

    fn accept(&mut self, line: &[u8]) {
        let blank = line.iter().all(|b| b.is_ascii_whitespace());
        if blank {
            return;
        }
        match decode(line) {
            Some(reading) => self.ready.push_back(reading),
            None => {
                debug!("Discarding malformed payload: {:?}", String::from_utf8_lossy(line));
                self.dropped += 1;
            }
        }
    }

    pub fn next_reading(&mut self) -> Option<Reading> {
        self.ready.pop_front()
    }

    /// Number of payloads discarded so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

fn decode(bytes: &[u8]) -> Option<Reading> {
    std::str::from_utf8(bytes).ok().and_then(parse_reading)
}
