//! AT transaction engine.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use log::{debug, trace, warn};
use tokio::time::Instant;

use super::framer::{FramerEnd, LineFramer, StopReason};
use super::patterns::{self, LineClass, PROMPT_MARKER};
use super::response::{Outcome, Response};
use crate::error::{ChannelError, Result};
use crate::transport::{ByteChannel, DEFAULT_READ_TIMEOUT};

/// Terminator appended to every command.
pub const CRLF: &[u8] = b"\r\n";

/// Line reported when a transaction is attempted on a closed channel.
const PORT_NOT_OPEN: &str = "Port not open";

/// Stand-in deadline for timeouts that overflow the clock (about 30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Configuration for AT transactions.
#[derive(Debug, Clone)]
pub struct AtConfig {
    /// Timeout used by [`AtChannel::send_command`], and the read timeout the
    /// channel is restored to after every transaction.
    pub default_timeout: Duration,

    /// Character that marks the payload prompt.
    pub prompt_marker: char,
}

impl Default for AtConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_READ_TIMEOUT,
            prompt_marker: PROMPT_MARKER,
        }
    }
}

/// Sets the channel read timeout for one transaction and restores the
/// default on drop, whichever way the transaction ends.
struct ReadTimeoutGuard<'a> {
    channel: &'a mut dyn ByteChannel,
    restore: Duration,
}

impl<'a> ReadTimeoutGuard<'a> {
    fn new(channel: &'a mut dyn ByteChannel, timeout: Duration, restore: Duration) -> Self {
        channel.set_read_timeout(timeout);
        Self { channel, restore }
    }
}

impl<'a> Deref for ReadTimeoutGuard<'a> {
    type Target = dyn ByteChannel + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.channel
    }
}

impl<'a> DerefMut for ReadTimeoutGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.channel
    }
}

impl Drop for ReadTimeoutGuard<'_> {
    fn drop(&mut self) {
        self.channel.set_read_timeout(self.restore);
    }
}

/// AT command channel over a byte channel.
///
/// Runs one transaction at a time: write a command, then read framed lines
/// until a terminal line (`OK`, `ERROR`, anything containing `UNKNOWN`) or the
/// deadline. Protocol failures, timeouts and I/O errors all come back as an
/// error [`Response`] carrying the lines seen so far.
pub struct AtChannel {
    /// The underlying byte channel.
    channel: Box<dyn ByteChannel>,

    /// Configuration for this channel.
    config: AtConfig,
}

impl AtChannel {
    /// Create an AT channel with the given configuration.
    pub fn new(channel: Box<dyn ByteChannel>, config: AtConfig) -> Self {
        Self { channel, config }
    }

    /// Create an AT channel with default configuration.
    pub fn with_defaults(channel: Box<dyn ByteChannel>) -> Self {
        Self::new(channel, AtConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &AtConfig {
        &self.config
    }

    /// Set the default timeout.
    pub fn set_default_timeout(&mut self, timeout: Duration) {
        self.config.default_timeout = timeout;
    }

    /// Check if the underlying channel is open.
    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    /// Give back the underlying byte channel.
    pub fn into_inner(self) -> Box<dyn ByteChannel> {
        self.channel
    }

    /// Send a command and wait for its terminal line, using the default timeout.
    pub async fn send_command(&mut self, command: &str) -> Response {
        let timeout = self.config.default_timeout;
        self.send_command_with_timeout(command, timeout).await
    }

    /// Send a command and wait up to `timeout` for its terminal line.
    pub async fn send_command_with_timeout(&mut self, command: &str, timeout: Duration) -> Response {
        if !self.channel.is_open() {
            return Response::error(vec![PORT_NOT_OPEN.to_string()]);
        }

        debug!("AT send: {:?} (timeout {:?})", command, timeout);
        let mut channel = ReadTimeoutGuard::new(
            self.channel.as_mut(),
            timeout,
            self.config.default_timeout,
        );
        let mut lines = Vec::new();

        if let Err(e) = write_command(&mut *channel, command).await {
            lines.push(io_failure_line(&e));
            return finish(command, Outcome::Error, lines);
        }

        let outcome = read_until_terminal(&mut *channel, timeout, &mut lines).await;
        finish(command, outcome, lines)
    }

    /// Send a command that answers with a prompt, then the payload.
    ///
    /// Waits up to `timeout` for a line containing the prompt marker, writes
    /// `payload` verbatim, then waits up to `timeout` again for the terminal
    /// line. Without a prompt the payload is never written and the response
    /// is an error.
    pub async fn send_command_with_payload(
        &mut self,
        command: &str,
        payload: &[u8],
        timeout: Duration,
    ) -> Response {
        if !self.channel.is_open() {
            return Response::error(vec![PORT_NOT_OPEN.to_string()]);
        }

        debug!(
            "AT send with payload: {:?} ({} payload bytes, timeout {:?})",
            command,
            payload.len(),
            timeout
        );
        let marker = self.config.prompt_marker;
        let mut channel = ReadTimeoutGuard::new(
            self.channel.as_mut(),
            timeout,
            self.config.default_timeout,
        );
        let mut lines = Vec::new();

        if let Err(e) = write_command(&mut *channel, command).await {
            lines.push(io_failure_line(&e));
            return finish(command, Outcome::Error, lines);
        }

        // Phase 1: wait for the prompt. Lines here are recorded, not classified.
        let mut framer = LineFramer::new(&mut *channel, deadline_after(timeout));
        let mut prompted = false;
        while let Some(line) = framer.next_line().await {
            let is_prompt = patterns::is_prompt(&line, marker);
            lines.push(line);
            if is_prompt {
                prompted = true;
                break;
            }
        }
        let end = framer.finish();

        if !prompted {
            warn!("no prompt for {:?}; payload not sent", command);
            absorb_end(end, &mut lines);
            return finish(command, Outcome::Error, lines);
        }

        // Phase 2: the payload, verbatim.
        trace!("AT payload: {} bytes", payload.len());
        if let Err(e) = write_payload(&mut *channel, payload).await {
            lines.push(io_failure_line(&e));
            return finish(command, Outcome::Error, lines);
        }

        // Phase 3: fresh deadline for the terminal line.
        let outcome = read_until_terminal(&mut *channel, timeout, &mut lines).await;
        finish(command, outcome, lines)
    }

    /// Write raw bytes without a terminator and without reading.
    pub async fn send_raw(&mut self, data: &[u8]) -> Result<()> {
        if !self.channel.is_open() {
            return Err(ChannelError::Unavailable.into());
        }

        trace!("AT raw: {} bytes", data.len());
        self.channel
            .write_all(data)
            .await
            .map_err(ChannelError::Io)?;
        self.channel.flush().await.map_err(ChannelError::Io)?;
        Ok(())
    }
}

async fn write_command(channel: &mut dyn ByteChannel, command: &str) -> std::io::Result<()> {
    let mut data = Vec::with_capacity(command.len() + CRLF.len());
    data.extend_from_slice(command.as_bytes());
    data.extend_from_slice(CRLF);
    channel.write_all(&data).await?;
    channel.flush().await
}

async fn write_payload(channel: &mut dyn ByteChannel, payload: &[u8]) -> std::io::Result<()> {
    channel.write_all(payload).await?;
    channel.flush().await
}

/// Deadline `timeout` from now. Timeouts too large to represent wait
/// practically forever instead of overflowing.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

/// Read and classify lines until a terminal line or `timeout` from now.
async fn read_until_terminal(
    channel: &mut dyn ByteChannel,
    timeout: Duration,
    lines: &mut Vec<String>,
) -> Outcome {
    let mut framer = LineFramer::new(channel, deadline_after(timeout));
    while let Some(line) = framer.next_line().await {
        let class = patterns::classify_line(&line);
        lines.push(line);
        if let LineClass::Terminal(outcome) = class {
            return outcome;
        }
    }

    let end = framer.finish();
    match &end.reason {
        StopReason::Deadline => debug!("deadline passed without a terminal line"),
        StopReason::EndOfData => debug!("end of data without a terminal line"),
        StopReason::Io(e) => warn!("read failed mid-transaction: {}", e),
        StopReason::Stopped => {}
    }
    absorb_end(end, lines);
    Outcome::Error
}

/// Append the unterminated remainder, then the read failure if there was one.
fn absorb_end(end: FramerEnd, lines: &mut Vec<String>) {
    if let Some(remainder) = end.remainder {
        lines.push(remainder);
    }
    if let StopReason::Io(e) = end.reason {
        lines.push(io_failure_line(&e));
    }
}

fn io_failure_line(e: &std::io::Error) -> String {
    format!("I/O error: {}", e)
}

fn finish(command: &str, outcome: Outcome, lines: Vec<String>) -> Response {
    debug!("AT done: {:?} -> {:?} ({} lines)", command, outcome, lines.len());
    Response::new(outcome, lines)
}
