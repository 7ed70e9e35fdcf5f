//! Byte channel abstraction.
//!
//! The transaction engine never opens or configures a port itself. It is
//! handed an already-open [`ByteChannel`] and only reads, writes, flushes and
//! adjusts the per-read timeout.

#[cfg(test)]
pub(crate) mod mock;
mod stream;

pub use stream::StreamChannel;

use std::io;
use std::time::Duration;

use async_trait::async_trait;

/// Read timeout a freshly opened channel is expected to use.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5000);

/// Bidirectional ordered byte stream to a modem.
///
/// Implementations wrap serial ports, TCP bridges or test doubles.
#[async_trait]
pub trait ByteChannel: Send {
    /// Whether the channel currently has a readable/writable stream.
    fn is_open(&self) -> bool;

    /// Read the next byte.
    ///
    /// Returns `Ok(None)` at end of data. A read that exceeds the channel's
    /// read timeout fails with [`io::ErrorKind::TimedOut`].
    async fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Write all bytes.
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush buffered writes.
    async fn flush(&mut self) -> io::Result<()>;

    /// Set the per-read timeout.
    fn set_read_timeout(&mut self, timeout: Duration);

    /// Get the per-read timeout.
    fn read_timeout(&self) -> Duration;
}
