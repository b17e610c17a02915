//! Link exchange state machine

use crate::error::{C1218Error, C1218Result};

/// State of the link during a single request/response exchange
///
/// # State Transitions
/// ```text
/// Idle/Done/Error -> AwaitAck (request written)
/// AwaitAck -> ReadHeader (ACK received)
/// ReadHeader -> ReadBody -> ValidateCrc
/// ValidateCrc -> ReadHeader (more fragments follow)
/// ValidateCrc -> Done (last fragment acknowledged)
/// any -> Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// No exchange has run yet
    #[default]
    Idle,
    /// Request sent, waiting for ACK/NAK
    AwaitAck,
    /// Reading the 6-byte header of a response packet
    ReadHeader,
    /// Reading the data field and CRC
    ReadBody,
    /// Checking the CRC of the packet just read
    ValidateCrc,
    /// Response fully received and acknowledged
    Done,
    /// The last exchange failed
    Error,
}

impl LinkState {
    /// Whether no exchange is in flight
    pub fn is_finished(&self) -> bool {
        matches!(self, LinkState::Idle | LinkState::Done | LinkState::Error)
    }

    /// Validate state transition
    pub fn validate_transition(&self, new_state: LinkState) -> C1218Result<()> {
        let valid = match (*self, new_state) {
            (LinkState::Idle | LinkState::Done | LinkState::Error, LinkState::AwaitAck) => true,
            (LinkState::AwaitAck, LinkState::ReadHeader) => true,
            (LinkState::ReadHeader, LinkState::ReadBody) => true,
            (LinkState::ReadBody, LinkState::ValidateCrc) => true,
            (LinkState::ValidateCrc, LinkState::ReadHeader) => true,
            (LinkState::ValidateCrc, LinkState::Done) => true,
            (_, LinkState::Error) => true,
            (LinkState::Done | LinkState::Error, LinkState::Idle) => true,
            _ => false,
        };

        if valid {
            Ok(())
        } else {
            Err(C1218Error::InvalidData(format!(
                "Invalid link state transition: {:?} -> {:?}",
                self, new_state
            )))
        }
    }
}
