//! C12.18 link layer module

pub mod checksum;
pub mod crc;
pub mod packet;
pub mod session;
pub mod state;
pub mod statistics;

pub use checksum::table_checksum;
pub use crc::{CrcCalc, crc16, verify_crc};
pub use packet::{
    ACK, CONTROL_TOGGLE, CRC_LENGTH, HEADER_LENGTH, IDENTITY, MAX_DATA, MULTI_PACKET, NAK, Packet,
    PacketHeader, STP, control_byte, encode,
};
pub use session::LinkSession;
pub use state::LinkState;
pub use statistics::LinkStatistics;
