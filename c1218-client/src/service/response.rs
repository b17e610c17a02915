//! Service response decoding

use crate::service::request::ServiceCode;
use c1218_core::error::{C1218Error, C1218Result};
use c1218_core::status::ResponseStatus;
use c1218_session::link::table_checksum;

/// Decoded result of one exchange: the leading status byte and whatever
/// follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    service: ServiceCode,
    status: ResponseStatus,
    payload: Vec<u8>,
}

impl ServiceResponse {
    /// Split reassembled response data into status and payload
    ///
    /// # Errors
    /// Returns `InvalidData` if the meter returned no data at all.
    pub fn decode(service: ServiceCode, data: Vec<u8>) -> C1218Result<Self> {
        let Some((&code, payload)) = data.split_first() else {
            return Err(C1218Error::InvalidData(format!(
                "Empty response to {}",
                service
            )));
        };
        Ok(Self {
            service,
            status: ResponseStatus::from_code(code),
            payload: payload.to_vec(),
        })
    }

    /// Service this response answers
    pub fn service(&self) -> ServiceCode {
        self.service
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_ok()
    }

    /// Human readable status, e.g. "OK" or "Insufficient Security Clearance"
    pub fn status_name(&self) -> &'static str {
        self.status.as_str()
    }

    /// Bytes after the status byte
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Turn a rejection status into `C1218Error::Rejected`
    pub fn into_result(self) -> C1218Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(C1218Error::Rejected {
                service: self.service.code(),
                status: self.status,
            })
        }
    }

    /// Split a table read response
    pub fn table_data(&self) -> C1218Result<TableData> {
        TableData::parse(self.status, &self.payload)
    }

    /// Decode the Ident response
    pub fn ident_info(&self) -> C1218Result<IdentInfo> {
        IdentInfo::parse(&self.payload)
    }

    /// Decode the Negotiate response
    pub fn negotiated_parameters(&self) -> C1218Result<NegotiatedParameters> {
        NegotiatedParameters::parse(&self.payload)
    }
}

/// Table read response: `<status><count><data><cksum>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub status: ResponseStatus,
    /// Count declared by the meter
    pub declared_length: u16,
    pub data: Vec<u8>,
    /// Table checksum sent after the data
    pub checksum: u8,
}

impl TableData {
    /// Parse the bytes following the status byte of a table read response
    pub fn parse(status: ResponseStatus, payload: &[u8]) -> C1218Result<Self> {
        if payload.len() < 3 {
            return Err(C1218Error::InvalidData(format!(
                "Table response too short: {} bytes",
                payload.len()
            )));
        }
        let declared_length = u16::from_be_bytes([payload[0], payload[1]]);
        let end = 2 + declared_length as usize;
        if payload.len() < end + 1 {
            return Err(C1218Error::InvalidData(format!(
                "Table response declares {} data bytes but carries {}",
                declared_length,
                payload.len() - 3
            )));
        }
        Ok(Self {
            status,
            declared_length,
            data: payload[2..end].to_vec(),
            checksum: payload[end],
        })
    }

    /// Whether the trailing checksum matches the data
    pub fn checksum_valid(&self) -> bool {
        table_checksum(&self.data) == self.checksum
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Ident response: `<std><ver><rev><feature>* <end-of-list>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentInfo {
    /// Reference standard (0x00 = ANSI C12.18)
    pub standard: u8,
    pub version: u8,
    pub revision: u8,
    /// Feature bytes before the end-of-list marker
    pub features: Vec<u8>,
}

impl IdentInfo {
    pub fn parse(payload: &[u8]) -> C1218Result<Self> {
        if payload.len() < 3 {
            return Err(C1218Error::InvalidData(format!(
                "Ident response too short: {} bytes",
                payload.len()
            )));
        }
        let mut features = payload[3..].to_vec();
        if features.last() == Some(&0x00) {
            features.pop();
        }
        Ok(Self {
            standard: payload[0],
            version: payload[1],
            revision: payload[2],
            features,
        })
    }
}

/// Negotiate response: `<packet-size><nbr-packets>[<baud-rate>]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedParameters {
    pub packet_size: u16,
    pub max_packets: u8,
    /// Absent when the meter keeps the current baud rate
    pub baud_code: Option<u8>,
}

impl NegotiatedParameters {
    pub fn parse(payload: &[u8]) -> C1218Result<Self> {
        if payload.len() < 3 {
            return Err(C1218Error::InvalidData(format!(
                "Negotiate response too short: {} bytes",
                payload.len()
            )));
        }
        Ok(Self {
            packet_size: u16::from_be_bytes([payload[0], payload[1]]),
            max_packets: payload[2],
            baud_code: payload.get(3).copied(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ok() {
        let response = ServiceResponse::decode(ServiceCode::Ident, vec![0x00]).unwrap();
        assert!(response.is_success());
        assert_eq!(response.status_name(), "OK");
        assert!(response.payload().is_empty());
    }

    #[test]
    fn test_decode_rejection() {
        let response =
            ServiceResponse::decode(ServiceCode::FullRead, vec![0x03, 0xFF]).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.status(), ResponseStatus::InsufficientSecurityClearance);
        assert_eq!(response.status_name(), "Insufficient Security Clearance");
        assert_eq!(response.payload(), &[0xFF]);

        match response.into_result() {
            Err(C1218Error::Rejected { service, status }) => {
                assert_eq!(service, 0x30);
                assert_eq!(status, ResponseStatus::InsufficientSecurityClearance);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_empty() {
        assert!(matches!(
            ServiceResponse::decode(ServiceCode::Ident, vec![]),
            Err(C1218Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_table_data() {
        let response = ServiceResponse::decode(
            ServiceCode::FullRead,
            vec![0x00, 0x00, 0x03, 0x01, 0x02, 0x03, 0xFA],
        )
        .unwrap();
        let table = response.table_data().unwrap();
        assert_eq!(table.status, ResponseStatus::Ok);
        assert_eq!(table.declared_length, 3);
        assert_eq!(table.data, vec![0x01, 0x02, 0x03]);
        assert_eq!(table.checksum, 0xFA);
        assert!(table.checksum_valid());
    }

    #[test]
    fn test_table_data_bad_checksum() {
        let table = TableData::parse(ResponseStatus::Ok, &[0x00, 0x01, 0x10, 0x00]).unwrap();
        assert!(!table.checksum_valid());
    }

    #[test]
    fn test_table_data_truncated() {
        assert!(TableData::parse(ResponseStatus::Ok, &[0x00, 0x05, 0x01, 0x02]).is_err());
        assert!(TableData::parse(ResponseStatus::Ok, &[0x00]).is_err());
    }

    #[test]
    fn test_ident_info() {
        let info = IdentInfo::parse(&[0x00, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!(info.standard, 0);
        assert_eq!(info.version, 1);
        assert_eq!(info.revision, 0);
        assert!(info.features.is_empty());

        let info = IdentInfo::parse(&[0x00, 0x02, 0x00, 0x06, 0x01, 0x00]).unwrap();
        assert_eq!(info.features, vec![0x06, 0x01]);
        assert!(IdentInfo::parse(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_negotiated_parameters() {
        let params = NegotiatedParameters::parse(&[0x01, 0x00, 0x01, 0x06]).unwrap();
        assert_eq!(params.packet_size, 256);
        assert_eq!(params.max_packets, 1);
        assert_eq!(params.baud_code, Some(6));

        let params = NegotiatedParameters::parse(&[0x00, 0x40, 0x02]).unwrap();
        assert_eq!(params.baud_code, None);
    }
}
