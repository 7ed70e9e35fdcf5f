//! Deadline-bound line framing over a [`ByteChannel`].
//!
//! The framer pulls one byte at a time so nothing past the current line is
//! consumed from the channel. Every read is bounded by the same absolute
//! deadline; the deadline is also checked before each read because a ready
//! byte would otherwise win over an already expired timer.

use std::io;

use log::trace;
use tokio::time::Instant;

use super::buffer::LineBuffer;
use crate::transport::ByteChannel;

/// Why a framer stopped producing lines.
#[derive(Debug)]
pub enum StopReason {
    /// The deadline passed.
    Deadline,

    /// The channel reported end of data.
    EndOfData,

    /// A read failed.
    Io(io::Error),

    /// The caller stopped pulling lines.
    Stopped,
}

/// Leftovers of a finished framer.
#[derive(Debug)]
pub struct FramerEnd {
    /// Unterminated text still in the buffer, if non-empty.
    pub remainder: Option<String>,

    /// Why reading stopped.
    pub reason: StopReason,
}

/// Lazy sequence of framed lines read from a channel until a deadline.
pub struct LineFramer<'a> {
    channel: &'a mut dyn ByteChannel,
    buffer: LineBuffer,
    deadline: Instant,
    stopped: Option<StopReason>,
}

impl<'a> LineFramer<'a> {
    /// Create a framer reading from `channel` until `deadline`.
    pub fn new(channel: &'a mut dyn ByteChannel, deadline: Instant) -> Self {
        Self {
            channel,
            buffer: LineBuffer::new(),
            deadline,
            stopped: None,
        }
    }

    /// Read the next complete line.
    ///
    /// Returns `None` once reading has stopped. The reason and any partial
    /// line are available from [`finish`](Self::finish).
    pub async fn next_line(&mut self) -> Option<String> {
        while self.stopped.is_none() {
            if Instant::now() >= self.deadline {
                self.stopped = Some(StopReason::Deadline);
                break;
            }

            let read = tokio::time::timeout_at(self.deadline, self.channel.read_byte()).await;
            match read {
                Err(_) => self.stopped = Some(StopReason::Deadline),
                Ok(Ok(None)) => self.stopped = Some(StopReason::EndOfData),
                Ok(Ok(Some(byte))) => {
                    if let Some(line) = self.buffer.push(byte) {
                        trace!("framed line: {:?}", line);
                        return Some(line);
                    }
                }
                // A channel-level read timeout is the same event as our deadline
                Ok(Err(e)) if e.kind() == io::ErrorKind::TimedOut => {
                    self.stopped = Some(StopReason::Deadline)
                }
                Ok(Err(e)) => self.stopped = Some(StopReason::Io(e)),
            }
        }
        None
    }

    /// Stop reading and return the unterminated remainder and stop reason.
    pub fn finish(mut self) -> FramerEnd {
        let reason = self.stopped.take().unwrap_or(StopReason::Stopped);
        FramerEnd {
            remainder: self.buffer.flush(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::transport::mock::MockChannel;

    async fn collect(framer: &mut LineFramer<'_>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = framer.next_line().await {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_frames_until_end_of_data() {
        let mut mock = MockChannel::new();
        mock.preload(b"\r\nATI\r\nMF710\r\n\r\nOK\r\n");

        let mut framer = LineFramer::new(&mut mock, Instant::now() + Duration::from_secs(1));
        assert_eq!(collect(&mut framer).await, vec!["ATI", "MF710", "OK"]);

        let end = framer.finish();
        assert!(end.remainder.is_none());
        assert!(matches!(end.reason, StopReason::EndOfData));
    }

    #[tokio::test]
    async fn test_partial_line_flushed_on_finish() {
        let mut mock = MockChannel::new();
        mock.preload(b"+CSQ: 21,99\r\nOK");

        let mut framer = LineFramer::new(&mut mock, Instant::now() + Duration::from_secs(1));
        assert_eq!(collect(&mut framer).await, vec!["+CSQ: 21,99"]);
        assert_eq!(framer.finish().remainder.as_deref(), Some("OK"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_stops_hanging_read() {
        let mut mock = MockChannel::new();
        mock.preload(b"+CREG: 0,1\r\npartial").hang_when_idle();

        let start = Instant::now();
        let mut framer = LineFramer::new(&mut mock, start + Duration::from_millis(500));
        assert_eq!(collect(&mut framer).await, vec!["+CREG: 0,1"]);
        assert!(start.elapsed() >= Duration::from_millis(500));

        let end = framer.finish();
        assert!(matches!(end.reason, StopReason::Deadline));
        assert_eq!(end.remainder.as_deref(), Some("partial"));
    }

    #[tokio::test]
    async fn test_expired_deadline_reads_nothing() {
        let mut mock = MockChannel::new();
        mock.preload(b"OK\r\n");

        let mut framer = LineFramer::new(&mut mock, Instant::now());
        assert_eq!(framer.next_line().await, None);
        assert!(matches!(framer.finish().reason, StopReason::Deadline));
        assert_eq!(mock.unread(), b"OK\r\n");
    }

    #[tokio::test]
    async fn test_read_error_stops() {
        let mut mock = MockChannel::new();
        mock.preload(b"abc").fail_reads(io::ErrorKind::BrokenPipe);

        let mut framer = LineFramer::new(&mut mock, Instant::now() + Duration::from_secs(1));
        assert_eq!(framer.next_line().await, None);

        let end = framer.finish();
        assert_eq!(end.remainder.as_deref(), Some("abc"));
        match end.reason {
            StopReason::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected I/O stop, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_channel_timeout_counts_as_deadline() {
        let mut mock = MockChannel::new();
        mock.fail_reads(io::ErrorKind::TimedOut);

        let mut framer = LineFramer::new(&mut mock, Instant::now() + Duration::from_secs(1));
        assert_eq!(framer.next_line().await, None);
        assert!(matches!(framer.finish().reason, StopReason::Deadline));
    }

    #[tokio::test]
    async fn test_caller_stop_leaves_rest_unread() {
        let mut mock = MockChannel::new();
        mock.preload(b"> \r\nOK\r\n");

        let mut framer = LineFramer::new(&mut mock, Instant::now() + Duration::from_secs(1));
        assert_eq!(framer.next_line().await.as_deref(), Some(">"));

        let end = framer.finish();
        assert!(matches!(end.reason, StopReason::Stopped));
        assert!(end.remainder.is_none());
        assert_eq!(mock.unread(), b"OK\r\n");
    }
}
