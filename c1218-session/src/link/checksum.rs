//! Table data checksum
//!
//! Table writes carry an 8-bit checksum after the data, distinct from the
//! packet CRC: one byte subtracted from the byte sum, then inverted. The
//! result equals the two's complement of the sum modulo 256.

/// Checksum appended to table data in write requests and read responses
pub fn table_checksum(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    let t = sum.wrapping_sub(1);
    t ^ 0xFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_checksum() {
        assert_eq!(table_checksum(&[0x01, 0x02, 0x03]), 0xFA);
        assert_eq!(table_checksum(&[]), 0x00);
        assert_eq!(table_checksum(&[0xFF, 0x01]), 0x00);
    }

    #[test]
    fn test_checksum_is_twos_complement() {
        let data = [0x10, 0x20, 0xF0, 0x7F];
        let sum = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        assert_eq!(sum.wrapping_add(table_checksum(&data)), 0);
    }
}
