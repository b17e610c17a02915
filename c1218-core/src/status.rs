//! C12.18 response status codes

use std::fmt;

/// Status byte leading every C12.18 response
///
/// Code 0 is the only success value. Codes 1-10 are the rejection and
/// retry reasons defined by the standard. Anything else is kept as
/// `Unknown` so the raw byte is never lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    Ok,
    Error,
    ServiceNotSupported,
    InsufficientSecurityClearance,
    OperationNotPossible,
    InappropriateActionRequest,
    DeviceBusy,
    DataNotReady,
    DataLocked,
    RenegotiateRequest,
    InvalidServiceSequenceState,
    Unknown(u8),
}

impl ResponseStatus {
    /// Map a status byte to its status
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => ResponseStatus::Ok,
            0x01 => ResponseStatus::Error,
            0x02 => ResponseStatus::ServiceNotSupported,
            0x03 => ResponseStatus::InsufficientSecurityClearance,
            0x04 => ResponseStatus::OperationNotPossible,
            0x05 => ResponseStatus::InappropriateActionRequest,
            0x06 => ResponseStatus::DeviceBusy,
            0x07 => ResponseStatus::DataNotReady,
            0x08 => ResponseStatus::DataLocked,
            0x09 => ResponseStatus::RenegotiateRequest,
            0x0A => ResponseStatus::InvalidServiceSequenceState,
            other => ResponseStatus::Unknown(other),
        }
    }

    /// Status byte value
    pub fn code(&self) -> u8 {
        match self {
            ResponseStatus::Ok => 0x00,
            ResponseStatus::Error => 0x01,
            ResponseStatus::ServiceNotSupported => 0x02,
            ResponseStatus::InsufficientSecurityClearance => 0x03,
            ResponseStatus::OperationNotPossible => 0x04,
            ResponseStatus::InappropriateActionRequest => 0x05,
            ResponseStatus::DeviceBusy => 0x06,
            ResponseStatus::DataNotReady => 0x07,
            ResponseStatus::DataLocked => 0x08,
            ResponseStatus::RenegotiateRequest => 0x09,
            ResponseStatus::InvalidServiceSequenceState => 0x0A,
            ResponseStatus::Unknown(code) => *code,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResponseStatus::Ok)
    }

    /// Short mnemonic used in meter documentation (`ok`, `err`, `isc`, ...)
    pub fn abbreviation(&self) -> &'static str {
        match self {
            ResponseStatus::Ok => "ok",
            ResponseStatus::Error => "err",
            ResponseStatus::ServiceNotSupported => "sns",
            ResponseStatus::InsufficientSecurityClearance => "isc",
            ResponseStatus::OperationNotPossible => "onp",
            ResponseStatus::InappropriateActionRequest => "iar",
            ResponseStatus::DeviceBusy => "bsy",
            ResponseStatus::DataNotReady => "dnr",
            ResponseStatus::DataLocked => "dlk",
            ResponseStatus::RenegotiateRequest => "rno",
            ResponseStatus::InvalidServiceSequenceState => "isss",
            ResponseStatus::Unknown(_) => "unknown",
        }
    }

    /// Get human-readable status name
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Ok => "OK",
            ResponseStatus::Error => "Error",
            ResponseStatus::ServiceNotSupported => "Service Not Supported",
            ResponseStatus::InsufficientSecurityClearance => "Insufficient Security Clearance",
            ResponseStatus::OperationNotPossible => "Operation Not Possible",
            ResponseStatus::InappropriateActionRequest => "Inappropriate Action Request",
            ResponseStatus::DeviceBusy => "Device Busy",
            ResponseStatus::DataNotReady => "Data Not Ready",
            ResponseStatus::DataLocked => "Data Locked",
            ResponseStatus::RenegotiateRequest => "Renegotiate Request",
            ResponseStatus::InvalidServiceSequenceState => "Invalid Service Sequence State",
            ResponseStatus::Unknown(_) => "Unknown",
        }
    }
}

impl From<u8> for ResponseStatus {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Unknown(code) => write!(f, "Unknown (0x{:02X})", code),
            other => f.write_str(other.as_str()),
        }
    }
}
