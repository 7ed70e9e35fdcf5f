//! High-level modem session.
//!
//! [`ModemBuilder`] wires a byte channel, the AT engine and a driver
//! together; [`Modem`] is the ready-to-use result.

mod builder;

pub use builder::ModemBuilder;

use log::debug;

use crate::modem::{ModemDriver, SendResult};
use crate::transport::ByteChannel;

/// An initialized modem ready to send messages.
pub struct Modem {
    driver: Box<dyn ModemDriver>,
}

impl Modem {
    pub(crate) fn new(driver: Box<dyn ModemDriver>) -> Self {
        Self { driver }
    }

    /// Model of the driver in use.
    pub fn model(&self) -> &str {
        self.driver.model()
    }

    /// Send a text message.
    pub async fn send_sms(&mut self, destination: &str, body: &str) -> SendResult {
        self.driver.send_sms(destination, body).await
    }

    /// End the session and give back the byte channel.
    pub fn close(self) -> Box<dyn ByteChannel> {
        debug!("closing {} session", self.driver.model());
        self.driver.into_channel().into_inner()
    }
}

impl std::fmt::Debug for Modem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modem")
            .field("model", &self.driver.model())
            .field("initialized", &self.driver.is_initialized())
            .finish()
    }
}
