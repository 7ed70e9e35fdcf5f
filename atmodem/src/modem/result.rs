//! Result type for message sends.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a send failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendFailure {
    /// `send_sms` was called before `initialize`.
    #[error("Driver not initialized")]
    NotInitialized,

    /// The modem answered with an unknown-command line.
    #[error("Command not supported or unknown response")]
    Unsupported,

    /// The modem answered `ERROR` or never finished the transaction.
    #[error("Send failed: {0}")]
    Rejected(String),
}

/// Outcome of one message send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    /// Message reference reported by the modem, if any.
    pub reference: Option<String>,

    /// Raw response lines joined with `\n`, for diagnostics.
    pub raw_response: String,

    /// Failure if the send did not succeed.
    pub failure: Option<SendFailure>,
}

impl SendResult {
    /// Create a successful result.
    pub fn sent(reference: Option<String>, raw_response: impl Into<String>) -> Self {
        Self {
            reference,
            raw_response: raw_response.into(),
            failure: None,
        }
    }

    /// Create a failed result.
    pub fn failed(failure: SendFailure, raw_response: impl Into<String>) -> Self {
        Self {
            reference: None,
            raw_response: raw_response.into(),
            failure: Some(failure),
        }
    }

    /// Check if the message was accepted by the modem.
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Human-readable failure description.
    pub fn failure_message(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sent() {
        let result = SendResult::sent(Some("12".to_string()), "+CMGS: 12\nOK");
        assert!(result.is_success());
        assert_eq!(result.reference.as_deref(), Some("12"));
        assert_eq!(result.failure_message(), None);
    }

    #[test]
    fn test_failed() {
        let result = SendResult::failed(SendFailure::Rejected("ERROR".into()), "ERROR");
        assert!(!result.is_success());
        assert!(result.reference.is_none());
        assert_eq!(result.failure_message().as_deref(), Some("Send failed: ERROR"));

        let result = SendResult::failed(SendFailure::NotInitialized, "");
        assert_eq!(
            result.failure_message().as_deref(),
            Some("Driver not initialized")
        );
    }

    #[test]
    fn test_serialize() {
        let result = SendResult::failed(SendFailure::Unsupported, "unknown");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"Unsupported\""));
        let back: SendResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
