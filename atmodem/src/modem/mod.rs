//! Modem drivers and model-based driver selection.
//!
//! A driver speaks one device's AT dialect on top of an [`AtChannel`]. The
//! [`DriverRegistry`] picks the driver by probing the modem's identification
//! output.

mod number;
mod registry;
mod result;
pub mod vendors;

pub use number::normalize_number;
pub use registry::{DriverFactory, DriverRegistry};
pub use result::{SendFailure, SendResult};

use async_trait::async_trait;

use crate::channel::AtChannel;
use crate::error::Result;

/// Handshake command every modem answers.
pub const HANDSHAKE_COMMAND: &str = "AT";

/// Identification command; the first substantive reply line names the model.
pub const IDENTIFY_COMMAND: &str = "ATI";

/// Trait for modem drivers.
///
/// A driver is bound to one [`AtChannel`] for its whole life. It starts
/// uninitialized and becomes ready after a successful [`initialize`](Self::initialize).
#[async_trait]
pub trait ModemDriver: Send {
    /// Model this driver was written for.
    fn model(&self) -> &str;

    /// Check if `initialize` has completed.
    fn is_initialized(&self) -> bool;

    /// Bring the modem into a state where it can send messages.
    async fn initialize(&mut self) -> Result<()>;

    /// Send a text message to `destination`.
    ///
    /// Failures, including use before initialization, are reported in the
    /// returned [`SendResult`].
    async fn send_sms(&mut self, destination: &str, body: &str) -> SendResult;

    /// Give back the AT channel.
    fn into_channel(self: Box<Self>) -> AtChannel;
}
