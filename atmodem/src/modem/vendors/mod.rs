//! Built-in modem drivers.

pub mod zte;

pub use zte::ZteMf710Driver;
