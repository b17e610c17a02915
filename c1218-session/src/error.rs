//! Error types shared with the rest of the stack

pub use c1218_core::error::{C1218Error, C1218Result};
