//! Line accumulation buffer.
//!
//! Bytes are collected until a line feed closes the line. Carriage returns are
//! dropped on the way in, so `\r\n`, `\n` and stray `\r` all frame the same.

use bytes::BytesMut;

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Buffer that turns a byte stream into trimmed, non-empty lines.
#[derive(Debug)]
pub struct LineBuffer {
    /// Bytes of the line currently being built.
    pending: BytesMut,
}

impl LineBuffer {
    /// Create an empty line buffer.
    pub fn new() -> Self {
        Self {
            pending: BytesMut::with_capacity(256),
        }
    }

    /// Feed one byte.
    ///
    /// Returns a line when `byte` is a line feed that closes a non-empty line.
    pub fn push(&mut self, byte: u8) -> Option<String> {
        match byte {
            CR => None,
            LF => {
                let raw = self.pending.split();
                non_empty(widen(&raw))
            }
            _ => {
                self.pending.extend_from_slice(&[byte]);
                None
            }
        }
    }

    /// Take whatever is buffered as a final line, if it is non-empty.
    pub fn flush(&mut self) -> Option<String> {
        let raw = self.pending.split();
        non_empty(widen(&raw))
    }

    /// Number of bytes waiting for a line feed.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if no partial line is buffered.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Widen each byte to the char with the same code point.
///
/// Modems answer in ASCII; anything else maps one-to-one instead of failing.
fn widen(raw: &[u8]) -> String {
    raw.iter().map(|&b| b as char).collect()
}

fn non_empty(line: String) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
