//! Builder for modem sessions.

use std::sync::Arc;
use std::time::Duration;

use log::info;

use super::Modem;
use crate::channel::{AtChannel, AtConfig};
use crate::error::Result;
use crate::modem::{DriverFactory, DriverRegistry, ModemDriver};
use crate::transport::ByteChannel;

/// Builder for opening a [`Modem`] session.
///
/// # Example
///
/// ```rust,no_run
/// use atmodem::{ModemBuilder, StreamChannel};
/// use tokio::net::TcpStream;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stream = TcpStream::connect("192.168.8.1:7000").await?;
/// let mut modem = ModemBuilder::new(StreamChannel::new(stream))
///     .open()
///     .await?;
///
/// let result = modem.send_sms("+5511999999999", "hello").await;
/// println!("sent: {}", result.is_success());
/// # Ok(())
/// # }
/// ```
pub struct ModemBuilder {
    channel: Box<dyn ByteChannel>,
    registry: DriverRegistry,
    driver: Option<DriverFactory>,
    config: AtConfig,
}

impl ModemBuilder {
    /// Create a builder over an already-open byte channel.
    pub fn new(channel: impl ByteChannel + 'static) -> Self {
        Self::from_boxed(Box::new(channel))
    }

    /// Create a builder over a boxed byte channel.
    pub fn from_boxed(channel: Box<dyn ByteChannel>) -> Self {
        Self {
            channel,
            registry: DriverRegistry::with_defaults(),
            driver: None,
            config: AtConfig::default(),
        }
    }

    /// Set the registry used to detect the driver (default: built-in drivers).
    pub fn registry(mut self, registry: DriverRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use this driver instead of probing the modem.
    pub fn driver<F>(mut self, factory: F) -> Self
    where
        F: Fn(AtChannel) -> Box<dyn ModemDriver> + Send + Sync + 'static,
    {
        self.driver = Some(Arc::new(factory));
        self
    }

    /// Set the AT channel configuration.
    pub fn config(mut self, config: AtConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default command timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = timeout;
        self
    }

    /// Select the driver and initialize the modem.
    ///
    /// The channel is consumed; on failure it is dropped with the builder.
    pub async fn open(self) -> Result<Modem> {
        let mut at = AtChannel::new(self.channel, self.config);

        let factory = match self.driver {
            Some(factory) => factory,
            None => self.registry.probe(&mut at).await?,
        };

        let mut driver = factory(at);
        driver.initialize().await?;
        info!("modem session open ({})", driver.model());

        Ok(Modem::new(driver))
    }
}
