//! [`ByteChannel`] over any tokio stream.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::{ByteChannel, DEFAULT_READ_TIMEOUT};

/// Byte channel backed by a tokio `AsyncRead + AsyncWrite` stream.
///
/// Works with serial port streams, TCP connections to a serial bridge, or
/// `tokio::io::duplex` in tests. Reads go through a [`BufReader`] so pulling
/// one byte at a time stays cheap.
pub struct StreamChannel<S> {
    /// The stream (None once closed).
    stream: Option<BufReader<S>>,

    /// Per-read timeout.
    read_timeout: Duration,
}

impl<S> StreamChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already-open stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(BufReader::new(stream)),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Drop the stream. Later operations see an unavailable channel.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("stream channel closed");
        }
    }

    /// Take the underlying stream back, discarding unread buffered bytes.
    pub fn into_inner(self) -> Option<S> {
        self.stream.map(BufReader::into_inner)
    }

    fn stream_mut(&mut self) -> io::Result<&mut BufReader<S>> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Port not open"))
    }
}

#[async_trait]
impl<S> ByteChannel for StreamChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    async fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let timeout = self.read_timeout;
        let stream = self.stream_mut()?;

        // read_u8 is cancel safe, so an expired timeout loses no data
        match tokio::time::timeout(timeout, stream.read_u8()).await {
            Ok(Ok(byte)) => Ok(Some(byte)),
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no data within {:?}", timeout),
            )),
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream_mut()?.get_mut().write_all(data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.stream_mut()?.get_mut().flush().await
    }

    fn set_read_timeout(&mut self, timeout: Duration) {
        self.read_timeout = timeout;
    }

    fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}
