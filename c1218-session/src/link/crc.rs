//! CRC-16/X-25 calculation for C12.18 packets
//!
//! Polynomial 0x1021 (processed bit-reversed as 0x8408), initial value
//! 0xFFFF, reflected input and output, final XOR 0xFFFF. The value is
//! stored on the wire low byte first.

/// CRC calculation constants
const INITIAL_CRC: u16 = 0xFFFF;
const GOOD_CRC: u16 = 0xF0B8;
const KEY: u16 = 0x8408; // Bit-reversed 1021

/// Precomputed CRC table
static CRC_TABLE: once_cell::sync::Lazy<[u16; 256]> = once_cell::sync::Lazy::new(|| {
    let mut table = [0u16; 256];
    for b in 0..=0xFF {
        let mut v = b as u16;
        for _ in 0..8 {
            if (v & 1) == 1 {
                v = (v >> 1) ^ KEY;
            } else {
                v >>= 1;
            }
        }
        table[b as usize] = v;
    }
    table
});

/// Incremental CRC calculator
#[derive(Debug, Clone)]
pub struct CrcCalc {
    crc_value: u16,
}

impl CrcCalc {
    /// Create a new CRC calculator
    pub fn new() -> Self {
        Self {
            crc_value: INITIAL_CRC,
        }
    }

    /// Reset the CRC value to initial state
    pub fn reset(&mut self) {
        self.crc_value = INITIAL_CRC;
    }

    /// Update the CRC value with a single byte
    pub fn update(&mut self, data: u8) {
        self.crc_value =
            (self.crc_value >> 8) ^ CRC_TABLE[((self.crc_value ^ data as u16) & 0xFF) as usize];
    }

    /// Update the CRC value with multiple bytes
    pub fn update_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Final CRC value (after the output XOR)
    pub fn value(&self) -> u16 {
        self.crc_value ^ 0xFFFF
    }

    /// Get the CRC value as wire bytes (little-endian)
    pub fn crc_bytes(&self) -> [u8; 2] {
        self.value().to_le_bytes()
    }

    /// Check the residue after feeding data followed by its wire CRC
    pub fn is_good(&self) -> bool {
        self.crc_value == GOOD_CRC
    }
}

impl Default for CrcCalc {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC-16/X-25 of `data`
pub fn crc16(data: &[u8]) -> u16 {
    let mut calc = CrcCalc::new();
    calc.update_bytes(data);
    calc.value()
}

/// Recompute the CRC of `frame_without_crc` and compare with the wire bytes
pub fn verify_crc(frame_without_crc: &[u8], crc_bytes: &[u8]) -> bool {
    crc_bytes.len() == 2 && crc16(frame_without_crc).to_le_bytes() == crc_bytes[..2]
}
