//! Response type for AT transactions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Final status of one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The modem answered `OK`.
    Ok,

    /// The modem answered `ERROR`, or no terminal line arrived in time.
    Error,

    /// The modem does not know the command.
    Unknown,
}

/// Response from one AT transaction.
///
/// Holds the outcome and every framed line seen during the transaction,
/// including the terminal line. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    outcome: Outcome,
    lines: Vec<String>,
}

impl Response {
    /// Create a response.
    pub fn new(outcome: Outcome, lines: Vec<String>) -> Self {
        Self { outcome, lines }
    }

    /// Create an error response.
    pub fn error(lines: Vec<String>) -> Self {
        Self::new(Outcome::Error, lines)
    }

    /// Get the outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Get the framed lines in arrival order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_ok(&self) -> bool {
        self.outcome == Outcome::Ok
    }

    pub fn is_error(&self) -> bool {
        self.outcome == Outcome::Error
    }

    pub fn is_unknown(&self) -> bool {
        self.outcome == Outcome::Unknown
    }

    /// Join the lines with `separator`.
    pub fn joined(&self, separator: &str) -> String {
        self.lines.join(separator)
    }

    /// Check if any line contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.lines.iter().any(|line| line.contains(pattern))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined("\n"))
    }
}
