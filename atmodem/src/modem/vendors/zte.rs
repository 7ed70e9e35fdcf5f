//! ZTE MF710 driver.
//!
//! Initialization runs `AT`, `AT+CMEE=1` and `AT+CMGF=1`. Verbose error
//! reporting (`CMEE`) is optional since some MF710 firmware answers
//! `unknown`; the handshake and text mode are mandatory. Messages go out in
//! text mode through `AT+CMGS`.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use crate::channel::{AtChannel, Response};
use crate::error::{DriverError, Result};
use crate::modem::{HANDSHAKE_COMMAND, ModemDriver, SendFailure, SendResult, normalize_number};

/// Model key this driver registers under.
pub const MODEL: &str = "MF710";

/// Verbose error reporting; optional.
const CMEE_COMMAND: &str = "AT+CMEE=1";

/// SMS text mode; mandatory.
const CMGF_COMMAND: &str = "AT+CMGF=1";

/// Prefix of the line carrying the message reference.
const CMGS_PREFIX: &str = "+CMGS:";

/// Message submission can take a while on a busy network.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Ends the message body in text mode.
const CTRL_Z: u8 = 0x1A;

/// Driver for the ZTE MF710 USB modem.
pub struct ZteMf710Driver {
    at: AtChannel,
    initialized: bool,
}

impl ZteMf710Driver {
    /// Create an uninitialized driver bound to `at`.
    pub fn new(at: AtChannel) -> Self {
        Self {
            at,
            initialized: false,
        }
    }
}

#[async_trait]
impl ModemDriver for ZteMf710Driver {
    fn model(&self) -> &str {
        MODEL
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    async fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            debug!("{} already initialized", MODEL);
            return Ok(());
        }

        let handshake = self.at.send_command(HANDSHAKE_COMMAND).await;
        require_ok(HANDSHAKE_COMMAND, &handshake)?;

        let cmee = self.at.send_command(CMEE_COMMAND).await;
        if !cmee.is_ok() {
            debug!("{} not supported ({:?}), continuing", CMEE_COMMAND, cmee.outcome());
        }

        let cmgf = self.at.send_command(CMGF_COMMAND).await;
        require_ok(CMGF_COMMAND, &cmgf)?;

        self.initialized = true;
        info!("{} initialized", MODEL);
        Ok(())
    }

    async fn send_sms(&mut self, destination: &str, body: &str) -> SendResult {
        if !self.initialized {
            return SendResult::failed(SendFailure::NotInitialized, "");
        }

        let number = normalize_number(destination);
        let command = format!("AT+CMGS=\"{}\"", number);
        let mut payload = Vec::with_capacity(body.len() + 1);
        payload.extend_from_slice(body.as_bytes());
        payload.push(CTRL_Z);

        let response = self
            .at
            .send_command_with_payload(&command, &payload, SEND_TIMEOUT)
            .await;
        let raw = response.joined("\n");

        if response.is_ok() {
            let reference = message_reference(response.lines());
            debug!("sms to {} accepted, reference {:?}", number, reference);
            return SendResult::sent(reference, raw);
        }
        if response.is_unknown() {
            return SendResult::failed(SendFailure::Unsupported, raw);
        }
        SendResult::failed(SendFailure::Rejected(raw.clone()), raw)
    }

    fn into_channel(self: Box<Self>) -> AtChannel {
        self.at
    }
}

fn require_ok(command: &str, response: &Response) -> Result<()> {
    if response.is_ok() {
        return Ok(());
    }
    Err(DriverError::InitializationFailed {
        command: command.to_string(),
        response: response.joined(" "),
    }
    .into())
}

/// Extract the reference from a `+CMGS: <mr>[,<scts>]` line.
fn message_reference(lines: &[String]) -> Option<String> {
    let rest = lines
        .iter()
        .find_map(|line| line.strip_prefix(CMGS_PREFIX))?;
    let reference = rest.split(',').next().unwrap_or(rest).trim();
    if reference.is_empty() {
        None
    } else {
        Some(reference.to_string())
    }
}
