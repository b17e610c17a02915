use crate::status::ResponseStatus;
use thiserror::Error;

/// Main error type for C12.18 operations
#[derive(Error, Debug)]
pub enum C1218Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout")]
    Timeout,

    #[error("Bad framing: {0}")]
    BadFraming(String),

    #[error("CRC mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    CrcMismatch { expected: u16, received: u16 },

    #[error("No ACK: {0}")]
    NoAck(String),

    #[error("Service 0x{service:02X} rejected: {status}")]
    Rejected { service: u8, status: ResponseStatus },

    #[error("Payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<C1218Error>,
    },

    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl C1218Error {
    /// Whether resending the same request may succeed
    ///
    /// Link-level failures (timeouts, framing, CRC, missing ACK) are
    /// retryable. I/O failures and everything above the link are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            C1218Error::Timeout
                | C1218Error::BadFraming(_)
                | C1218Error::CrcMismatch { .. }
                | C1218Error::NoAck(_)
        )
    }

    /// Innermost error, unwrapping `RetriesExhausted`
    pub fn root_cause(&self) -> &C1218Error {
        match self {
            C1218Error::RetriesExhausted { last, .. } => last.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for C12.18 operations
pub type C1218Result<T> = Result<T, C1218Error>;
