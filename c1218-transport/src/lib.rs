//! Transport layer module for the ANSI C12.18 protocol
//!
//! This crate provides the byte-level transports a link session drives:
//! the optical probe / serial line, and a generic adapter over any async
//! byte stream.

pub mod error;
pub mod io;
pub mod serial;
pub mod stream;

pub use error::{C1218Error, C1218Result};
pub use io::IoTransport;
pub use serial::{SerialSettings, SerialTransport};
pub use stream::{StreamAccessor, TransportLayer};
