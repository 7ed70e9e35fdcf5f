//! Scripted [`ByteChannel`] for unit tests.
//!
//! Every `write_all` call is logged and releases the next scripted reply into
//! the read queue. Clones share state, so a test can keep a handle after the
//! channel has been boxed into an engine.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{ByteChannel, DEFAULT_READ_TIMEOUT};

#[derive(Debug)]
struct MockState {
    open: bool,
    replies: VecDeque<Vec<u8>>,
    incoming: VecDeque<u8>,
    writes: Vec<Vec<u8>>,
    flushes: usize,
    read_timeout: Duration,
    timeout_history: Vec<Duration>,
    hang_when_idle: bool,
    read_failure: Option<io::ErrorKind>,
    write_failure: Option<io::ErrorKind>,
}

/// Scripted byte channel shared between the code under test and the test.
#[derive(Debug, Clone)]
pub(crate) struct MockChannel {
    state: Arc<Mutex<MockState>>,
}

impl MockChannel {
    /// An open channel that reports end of data once its read queue is empty.
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                open: true,
                replies: VecDeque::new(),
                incoming: VecDeque::new(),
                writes: Vec::new(),
                flushes: 0,
                read_timeout: DEFAULT_READ_TIMEOUT,
                timeout_history: Vec::new(),
                hang_when_idle: false,
                read_failure: None,
                write_failure: None,
            })),
        }
    }

    /// A channel without a stream.
    pub(crate) fn unavailable() -> Self {
        let mock = Self::new();
        mock.lock().open = false;
        mock
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Queue the bytes released by the next write.
    pub(crate) fn reply(&self, response: &[u8]) -> &Self {
        self.lock().replies.push_back(response.to_vec());
        self
    }

    /// Make bytes readable right away, independent of writes.
    pub(crate) fn preload(&self, data: &[u8]) -> &Self {
        self.lock().incoming.extend(data);
        self
    }

    /// Block reads forever once the queue is drained instead of reporting EOF.
    pub(crate) fn hang_when_idle(&self) -> &Self {
        self.lock().hang_when_idle = true;
        self
    }

    /// Fail reads with `kind` once the queue is drained.
    pub(crate) fn fail_reads(&self, kind: io::ErrorKind) -> &Self {
        self.lock().read_failure = Some(kind);
        self
    }

    /// Fail every write with `kind`.
    pub(crate) fn fail_writes(&self, kind: io::ErrorKind) -> &Self {
        self.lock().write_failure = Some(kind);
        self
    }

    /// All writes so far, one entry per `write_all` call.
    pub(crate) fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().writes.clone()
    }

    /// All writes so far, lossily decoded.
    pub(crate) fn written_text(&self) -> Vec<String> {
        self.lock()
            .writes
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }

    pub(crate) fn flush_count(&self) -> usize {
        self.lock().flushes
    }

    /// Every value passed to `set_read_timeout`, in order.
    pub(crate) fn timeout_history(&self) -> Vec<Duration> {
        self.lock().timeout_history.clone()
    }

    pub(crate) fn current_read_timeout(&self) -> Duration {
        self.lock().read_timeout
    }

    /// Bytes still waiting to be read.
    pub(crate) fn unread(&self) -> Vec<u8> {
        self.lock().incoming.iter().copied().collect()
    }
}

#[async_trait]
impl ByteChannel for MockChannel {
    fn is_open(&self) -> bool {
        self.lock().open
    }

    async fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let hang = {
            let mut state = self.lock();
            if let Some(byte) = state.incoming.pop_front() {
                return Ok(Some(byte));
            }
            if let Some(kind) = state.read_failure {
                return Err(io::Error::new(kind, "mock read failure"));
            }
            state.hang_when_idle
        };

        if hang {
            std::future::pending::<()>().await;
        }
        Ok(None)
    }

    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let mut state = self.lock();
        if let Some(kind) = state.write_failure {
            return Err(io::Error::new(kind, "mock write failure"));
        }
        state.writes.push(data.to_vec());
        if let Some(reply) = state.replies.pop_front() {
            state.incoming.extend(reply);
        }
        Ok(())
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.lock().flushes += 1;
        Ok(())
    }

    fn set_read_timeout(&mut self, timeout: Duration) {
        let mut state = self.lock();
        state.read_timeout = timeout;
        state.timeout_history.push(timeout);
    }

    fn read_timeout(&self) -> Duration {
        self.lock().read_timeout
    }
}
