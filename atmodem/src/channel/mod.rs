//! AT channel layer: line framing, classification and transactions.
//!
//! This module turns a raw byte channel into request/response transactions,
//! including the prompt-then-payload variant used by commands such as
//! `AT+CMGS`.

mod at;
mod buffer;
mod framer;
mod patterns;
mod response;

pub use at::{AtChannel, AtConfig, CRLF};
pub use buffer::LineBuffer;
pub use framer::{FramerEnd, LineFramer, StopReason};
pub use patterns::{LineClass, PROMPT_MARKER, classify_line, is_prompt};
pub use response::{Outcome, Response};
