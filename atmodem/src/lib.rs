//! # atmodem
//!
//! Async AT command engine and SMS drivers for USB cellular modems.
//!
//! atmodem talks to a modem over any byte channel (a serial port stream, a
//! TCP serial bridge, or a test pipe), runs AT transactions with deadlines,
//! and picks a vendor driver from the modem's `ATI` identification.
//!
//! ## Features
//!
//! - Line-framed AT transactions with `OK`/`ERROR`/unknown classification
//! - Prompt-then-payload transactions for `AT+CMGS`
//! - Read timeouts that are always restored after a transaction
//! - Model-based driver selection with an extensible registry
//! - Text-mode SMS for the ZTE MF710
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atmodem::{ModemBuilder, StreamChannel};
//! use tokio::net::TcpStream;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stream = TcpStream::connect("192.168.8.1:7000").await?;
//!     let mut modem = ModemBuilder::new(StreamChannel::new(stream))
//!         .open()
//!         .await?;
//!
//!     let result = modem.send_sms("5511999999999", "hello").await;
//!     match result.failure_message() {
//!         None => println!("sent, reference {:?}", result.reference),
//!         Some(reason) => eprintln!("failed: {}", reason),
//!     }
//!
//!     modem.close();
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod modem;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use channel::{AtChannel, AtConfig, Outcome, Response};
pub use error::{Error, Result};
pub use modem::{DriverRegistry, ModemDriver, SendFailure, SendResult};
pub use session::{Modem, ModemBuilder};
pub use transport::{ByteChannel, StreamChannel};
