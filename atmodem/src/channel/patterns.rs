//! Line classification.
//!
//! Every framed line is classified as soon as it is read. `OK` and `ERROR`
//! must be the whole line; `UNKNOWN` may appear anywhere (some firmware
//! answers unsupported commands with text such as `unknown command`).

use super::response::Outcome;

/// Default marker the modem sends when it is ready for a payload.
pub const PROMPT_MARKER: char = '>';

/// Classification of one framed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// The line ends the transaction with this outcome.
    Terminal(Outcome),

    /// Intermediate output; keep reading.
    Informational,
}

impl LineClass {
    /// Get the outcome if this is a terminal line.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            LineClass::Terminal(outcome) => Some(outcome),
            LineClass::Informational => None,
        }
    }
}

/// Classify a trimmed, non-empty line.
pub fn classify_line(line: &str) -> LineClass {
    if line.eq_ignore_ascii_case("OK") {
        LineClass::Terminal(Outcome::Ok)
    } else if line.eq_ignore_ascii_case("ERROR") {
        LineClass::Terminal(Outcome::Error)
    } else if line.to_ascii_uppercase().contains("UNKNOWN") {
        LineClass::Terminal(Outcome::Unknown)
    } else {
        LineClass::Informational
    }
}

/// Check if a line carries the payload prompt.
pub fn is_prompt(line: &str, marker: char) -> bool {
    line.contains(marker)
}
