//! Table 01: general manufacturer identification

use c1218_core::error::{C1218Error, C1218Result};

const MIN_LENGTH: usize = 16;

/// Decoded Table 01
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerIdentification {
    pub manufacturer: String,
    pub model: String,
    pub hw_version: u8,
    pub hw_revision: u8,
    pub fw_version: u8,
    pub fw_revision: u8,
    pub serial_number: String,
}

impl ManufacturerIdentification {
    /// Parse the table data of a Table 01 read (without count and checksum)
    pub fn parse(data: &[u8]) -> C1218Result<Self> {
        if data.len() < MIN_LENGTH {
            return Err(C1218Error::InvalidData(format!(
                "Table 01 too short: {} bytes",
                data.len()
            )));
        }
        Ok(Self {
            manufacturer: ascii_field(&data[0..4]),
            model: ascii_field(&data[4..12]),
            hw_version: data[12],
            hw_revision: data[13],
            fw_version: data[14],
            fw_revision: data[15],
            serial_number: ascii_field(&data[16..]),
        })
    }
}

fn ascii_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches([' ', '\0'])
        .to_string()
}
