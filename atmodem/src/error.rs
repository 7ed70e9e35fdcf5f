//! Error types for atmodem.
//!
//! Transaction-level failures (timeouts, I/O errors, `ERROR` replies) never
//! show up here: they are folded into an error [`Response`](crate::channel::Response).
//! These types cover what is left: raw writes, driver resolution and driver
//! initialization.

use std::io;
use thiserror::Error;

/// Main error type for atmodem operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Byte channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver registry errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Modem driver errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

/// Byte channel errors.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The channel has no readable/writable stream.
    #[error("Port not open")]
    Unavailable,

    /// I/O error while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Driver registry errors (model detection and lookup).
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The identification response had no model line.
    #[error("Could not determine modem model from identification response: {lines:?}")]
    UnresolvableModel { lines: Vec<String> },

    /// A model line was found but no registered key matches it.
    #[error("No driver registered for modem model '{model}'")]
    NoDriverRegistered { model: String },

    /// A probe step did not end with `OK`.
    #[error("Modem did not respond to {command}: {response}")]
    ProbeFailed { command: String, response: String },
}

/// Modem driver errors.
#[derive(Error, Debug)]
pub enum DriverError {
    /// A mandatory initialization command failed.
    #[error("Initialization failed ({command}): {response}")]
    InitializationFailed { command: String, response: String },
}

/// Result type alias using atmodem's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display() {
        let err: Error = ChannelError::Unavailable.into();
        assert_eq!(err.to_string(), "Channel error: Port not open");
    }

    #[test]
    fn test_io_from() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe broken");
        let err: ChannelError = io_err.into();
        assert!(matches!(err, ChannelError::Io(_)));
        assert!(err.to_string().contains("pipe broken"));
    }

    #[test]
    fn test_registry_display() {
        let err = RegistryError::NoDriverRegistered {
            model: "HUAWEI E3372".into(),
        };
        assert_eq!(
            err.to_string(),
            "No driver registered for modem model 'HUAWEI E3372'"
        );

        let err = RegistryError::ProbeFailed {
            command: "ATI".into(),
            response: "ERROR".into(),
        };
        assert_eq!(err.to_string(), "Modem did not respond to ATI: ERROR");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
