//! Service request encoding
//!
//! ```text
//! <ident>         ::= 20H
//! <terminate>     ::= 21H
//! <full-read>     ::= 30H <tableid>
//! <full-write>    ::= 40H <tableid> <count> <data> <cksum>
//! <pwrite-offset> ::= 4FH <tableid> <offset> <count> <data> <cksum>
//! <logon>         ::= 50H <user-id> <user>
//! <security>      ::= 51H <password>
//! <logoff>        ::= 52H
//! <negotiate>     ::= 61H <packet-size> <nbr-packets> <baud-rate>
//! ```
//!
//! Table IDs, counts and user IDs are big-endian; offsets are 24-bit
//! big-endian.

use bytes::{BufMut, BytesMut};
use c1218_core::catalog::PROCEDURE_TABLE;
use c1218_core::config::NegotiationParameters;
use c1218_core::credentials::{SecurityCode, UserName};
use c1218_core::error::{C1218Error, C1218Result};
use c1218_session::link::{MAX_DATA, encode, table_checksum};
use std::fmt;

/// Largest offset a partial write can address
pub const MAX_OFFSET: u32 = 0x00FF_FFFF;

/// Sequence number placed in every request packet
const REQUEST_SEQUENCE: u8 = 0;

/// Service codes used by the master
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ServiceCode {
    Ident = 0x20,
    Terminate = 0x21,
    FullRead = 0x30,
    FullWrite = 0x40,
    PartialWrite = 0x4F,
    Logon = 0x50,
    Security = 0x51,
    Logoff = 0x52,
    Negotiate = 0x61,
}

impl ServiceCode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x20 => Some(Self::Ident),
            0x21 => Some(Self::Terminate),
            0x30 => Some(Self::FullRead),
            0x40 => Some(Self::FullWrite),
            0x4F => Some(Self::PartialWrite),
            0x50 => Some(Self::Logon),
            0x51 => Some(Self::Security),
            0x52 => Some(Self::Logoff),
            0x61 => Some(Self::Negotiate),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ident => "Ident",
            Self::Terminate => "Terminate",
            Self::FullRead => "Full Read",
            Self::FullWrite => "Full Write",
            Self::PartialWrite => "Partial Write",
            Self::Logon => "Logon",
            Self::Security => "Security",
            Self::Logoff => "Logoff",
            Self::Negotiate => "Negotiate",
        }
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.code())
    }
}

/// A service request ready to be framed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRequest {
    Ident,
    Terminate,
    Logoff,
    Negotiate(NegotiationParameters),
    Logon { user_id: u16, user: UserName },
    Security(SecurityCode),
    FullRead { table: u16 },
    FullWrite { table: u16, data: Vec<u8> },
    PartialWrite { table: u16, offset: u32, data: Vec<u8> },
}

impl ServiceRequest {
    /// Procedure invocation: a full write of `<proc id LE><sequence><data>`
    /// to the procedure table
    pub fn procedure(procedure: u16, sequence: u8, data: &[u8]) -> Self {
        let mut record = Vec::with_capacity(3 + data.len());
        record.extend_from_slice(&procedure.to_le_bytes());
        record.push(sequence);
        record.extend_from_slice(data);
        ServiceRequest::FullWrite {
            table: PROCEDURE_TABLE,
            data: record,
        }
    }

    pub fn service_code(&self) -> ServiceCode {
        match self {
            ServiceRequest::Ident => ServiceCode::Ident,
            ServiceRequest::Terminate => ServiceCode::Terminate,
            ServiceRequest::Logoff => ServiceCode::Logoff,
            ServiceRequest::Negotiate(_) => ServiceCode::Negotiate,
            ServiceRequest::Logon { .. } => ServiceCode::Logon,
            ServiceRequest::Security(_) => ServiceCode::Security,
            ServiceRequest::FullRead { .. } => ServiceCode::FullRead,
            ServiceRequest::FullWrite { .. } => ServiceCode::FullWrite,
            ServiceRequest::PartialWrite { .. } => ServiceCode::PartialWrite,
        }
    }

    /// Encode the body that follows the service code
    ///
    /// # Errors
    /// - `PayloadTooLarge` if write data cannot fit in one packet
    /// - `InvalidData` if a partial write offset exceeds 24 bits
    pub fn encode_payload(&self) -> C1218Result<Vec<u8>> {
        let mut buf = BytesMut::new();
        match self {
            ServiceRequest::Ident | ServiceRequest::Terminate | ServiceRequest::Logoff => {}
            ServiceRequest::Negotiate(params) => buf.put_slice(&params.encode()),
            ServiceRequest::Logon { user_id, user } => {
                buf.put_u16(*user_id);
                buf.put_slice(user.as_bytes());
            }
            ServiceRequest::Security(code) => buf.put_slice(code.as_bytes()),
            ServiceRequest::FullRead { table } => buf.put_u16(*table),
            ServiceRequest::FullWrite { table, data } => {
                buf.put_u16(*table);
                put_table_data(&mut buf, data)?;
            }
            ServiceRequest::PartialWrite {
                table,
                offset,
                data,
            } => {
                if *offset > MAX_OFFSET {
                    return Err(C1218Error::InvalidData(format!(
                        "Partial write offset 0x{:X} exceeds 24 bits",
                        offset
                    )));
                }
                buf.put_u16(*table);
                buf.put_slice(&offset.to_be_bytes()[1..]);
                put_table_data(&mut buf, data)?;
            }
        }
        Ok(buf.to_vec())
    }

    /// Encode the complete request packet
    pub fn to_packet(&self, control_bit: bool) -> C1218Result<Vec<u8>> {
        encode(
            self.service_code().code(),
            &self.encode_payload()?,
            control_bit,
            REQUEST_SEQUENCE,
        )
    }
}

fn put_table_data(buf: &mut BytesMut, data: &[u8]) -> C1218Result<()> {
    if data.len() > MAX_DATA {
        return Err(C1218Error::PayloadTooLarge {
            len: data.len(),
            max: MAX_DATA,
        });
    }
    buf.put_u16(data.len() as u16);
    buf.put_slice(data);
    buf.put_u8(table_checksum(data));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_codes() {
        for code in [0x20, 0x21, 0x30, 0x40, 0x4F, 0x50, 0x51, 0x52, 0x61] {
            assert_eq!(ServiceCode::from_code(code).unwrap().code(), code);
        }
        assert_eq!(ServiceCode::from_code(0x00), None);
        assert_eq!(ServiceCode::Ident.to_string(), "Ident (0x20)");
    }

    #[test]
    fn test_empty_bodies() {
        for request in [
            ServiceRequest::Ident,
            ServiceRequest::Terminate,
            ServiceRequest::Logoff,
        ] {
            assert!(request.encode_payload().unwrap().is_empty());
        }
    }

    #[test]
    fn test_ident_packet() {
        assert_eq!(
            ServiceRequest::Ident.to_packet(false).unwrap(),
            vec![0xEE, 0x00, 0x00, 0x00, 0x00, 0x01, 0x20, 0x13, 0x10]
        );
        assert_eq!(
            ServiceRequest::Terminate.to_packet(true).unwrap(),
            vec![0xEE, 0x00, 0x20, 0x00, 0x00, 0x01, 0x21, 0x0B, 0x61]
        );
    }

    #[test]
    fn test_negotiate_payload() {
        let request = ServiceRequest::Negotiate(NegotiationParameters::default());
        assert_eq!(request.encode_payload().unwrap(), vec![0x01, 0x00, 0x01, 0x06]);
    }

    #[test]
    fn test_logon_payload() {
        let request = ServiceRequest::Logon {
            user_id: 2,
            user: UserName::default(),
        };
        let payload = request.encode_payload().unwrap();
        assert_eq!(payload.len(), 12);
        assert_eq!(&payload[..2], &[0x00, 0x02]);
        assert_eq!(&payload[2..], b"0123456789");
    }

    #[test]
    fn test_security_payload() {
        let request = ServiceRequest::Security(SecurityCode::from("secret"));
        let payload = request.encode_payload().unwrap();
        assert_eq!(payload.len(), 20);
        assert_eq!(&payload[..6], b"secret");
        assert!(payload[6..].iter().all(|&b| b == 0x20));
    }

    #[test]
    fn test_full_read_packet() {
        let request = ServiceRequest::FullRead { table: 1 };
        assert_eq!(
            request.to_packet(false).unwrap(),
            vec![0xEE, 0x00, 0x00, 0x00, 0x00, 0x03, 0x30, 0x00, 0x01, 0x55, 0x0D]
        );
    }

    #[test]
    fn test_full_write_payload() {
        let request = ServiceRequest::FullWrite {
            table: 0x0102,
            data: vec![0x01, 0x02, 0x03],
        };
        assert_eq!(
            request.encode_payload().unwrap(),
            vec![0x01, 0x02, 0x00, 0x03, 0x01, 0x02, 0x03, 0xFA]
        );
    }

    #[test]
    fn test_partial_write_carries_offset() {
        let request = ServiceRequest::PartialWrite {
            table: 2048,
            offset: 0x012345,
            data: vec![0xAA],
        };
        assert_eq!(
            request.encode_payload().unwrap(),
            vec![0x08, 0x00, 0x01, 0x23, 0x45, 0x00, 0x01, 0xAA, 0x56]
        );
    }

    #[test]
    fn test_partial_write_offset_limit() {
        let request = ServiceRequest::PartialWrite {
            table: 1,
            offset: 0x0100_0000,
            data: vec![0x00],
        };
        assert!(matches!(
            request.encode_payload(),
            Err(C1218Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_procedure_record() {
        let request = ServiceRequest::procedure(2049, 5, &[0xDE, 0xAD]);
        match &request {
            ServiceRequest::FullWrite { table, data } => {
                assert_eq!(*table, 7);
                assert_eq!(data, &vec![0x01, 0x08, 0x05, 0xDE, 0xAD]);
            }
            other => panic!("unexpected request: {:?}", other),
        }
        assert_eq!(request.service_code(), ServiceCode::FullWrite);
    }

    #[test]
    fn test_write_too_large() {
        let request = ServiceRequest::FullWrite {
            table: 1,
            data: vec![0u8; MAX_DATA + 1],
        };
        assert!(matches!(
            request.encode_payload(),
            Err(C1218Error::PayloadTooLarge { .. })
        ));
        let request = ServiceRequest::FullWrite {
            table: 1,
            data: vec![0u8; MAX_DATA - 5],
        };
        assert!(matches!(
            request.to_packet(false),
            Err(C1218Error::PayloadTooLarge { .. })
        ));
    }
}
