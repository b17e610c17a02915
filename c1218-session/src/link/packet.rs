//! C12.18 packet structure and encoding/decoding
//!
//! ```text
//! +------+----------+-------+-------+--------+----------+---------+
//! | STP  | identity | ctrl  | seq   | length | data     | CRC     |
//! | 0xEE | 0x00     | 1     | 1     | 2 (BE) | length   | 2 (LE)  |
//! +------+----------+-------+-------+--------+----------+---------+
//! ```

use crate::error::{C1218Error, C1218Result};
use crate::link::crc::{crc16, verify_crc};
use bytes::{BufMut, BytesMut};
use c1218_core::config::FragmentSignal;
use std::fmt;

/// Start-of-packet marker
pub const STP: u8 = 0xEE;

/// Identity byte (always zero for point-to-point optical links)
pub const IDENTITY: u8 = 0x00;

/// Single-byte positive acknowledgement
pub const ACK: u8 = 0x06;

/// Single-byte negative acknowledgement
pub const NAK: u8 = 0x15;

/// Control bit alternated by the master between successive requests
pub const CONTROL_TOGGLE: u8 = 0x20;

/// Control bit a meter sets when more fragments follow
pub const MULTI_PACKET: u8 = 0x01;

/// Largest data field a single packet may carry
pub const MAX_DATA: usize = 8183;

/// STP + identity + ctrl + seq + 2-byte length
pub const HEADER_LENGTH: usize = 6;

pub const CRC_LENGTH: usize = 2;

/// Control byte for a request with the given toggle state
pub fn control_byte(control_bit: bool) -> u8 {
    if control_bit { CONTROL_TOGGLE } else { 0x00 }
}

/// Parsed 6-byte packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    control: u8,
    sequence: u8,
    length: u16,
}

impl PacketHeader {
    /// Parse a header read off the wire
    ///
    /// # Errors
    /// Returns `BadFraming` if the STP marker is wrong or the declared
    /// length exceeds [`MAX_DATA`].
    pub fn parse(bytes: &[u8; HEADER_LENGTH]) -> C1218Result<Self> {
        if bytes[0] != STP {
            return Err(C1218Error::BadFraming(format!(
                "Expected start byte 0x{:02X}, got 0x{:02X}",
                STP, bytes[0]
            )));
        }
        let length = u16::from_be_bytes([bytes[4], bytes[5]]);
        if length as usize > MAX_DATA {
            return Err(C1218Error::BadFraming(format!(
                "Declared length {} exceeds maximum {}",
                length, MAX_DATA
            )));
        }
        Ok(Self {
            control: bytes[2],
            sequence: bytes[3],
            length,
        })
    }

    pub fn control(&self) -> u8 {
        self.control
    }

    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Declared data length
    pub fn length(&self) -> u16 {
        self.length
    }

    /// Whether further fragments follow this one
    pub fn has_more_fragments(&self, signal: FragmentSignal) -> bool {
        match signal {
            FragmentSignal::ControlLowBit => self.control & MULTI_PACKET != 0,
            FragmentSignal::SequenceNonZero => self.sequence != 0,
        }
    }

    fn to_bytes(self) -> [u8; HEADER_LENGTH] {
        let len = self.length.to_be_bytes();
        [STP, IDENTITY, self.control, self.sequence, len[0], len[1]]
    }
}

/// C12.18 packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    control: u8,
    sequence: u8,
    data: Vec<u8>,
}

impl Packet {
    /// Create a packet from its raw fields
    ///
    /// # Errors
    /// Returns `PayloadTooLarge` if `data` exceeds [`MAX_DATA`].
    pub fn new(control: u8, sequence: u8, data: Vec<u8>) -> C1218Result<Self> {
        if data.len() > MAX_DATA {
            return Err(C1218Error::PayloadTooLarge {
                len: data.len(),
                max: MAX_DATA,
            });
        }
        Ok(Self {
            control,
            sequence,
            data,
        })
    }

    /// Build a request packet: the data field is the service code followed
    /// by the payload.
    pub fn request(
        service_code: u8,
        payload: &[u8],
        control_bit: bool,
        sequence: u8,
    ) -> C1218Result<Self> {
        let mut data = Vec::with_capacity(payload.len() + 1);
        data.push(service_code);
        data.extend_from_slice(payload);
        Self::new(control_byte(control_bit), sequence, data)
    }

    pub(crate) fn from_parts(header: PacketHeader, data: Vec<u8>) -> Self {
        Self {
            control: header.control,
            sequence: header.sequence,
            data,
        }
    }

    pub fn control(&self) -> u8 {
        self.control
    }

    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Toggle state carried in the control byte
    pub fn control_bit(&self) -> bool {
        self.control & CONTROL_TOGGLE != 0
    }

    /// First data byte (service code of a request, status of a response)
    pub fn service_code(&self) -> Option<u8> {
        self.data.first().copied()
    }

    /// Data after the first byte
    pub fn body(&self) -> &[u8] {
        self.data.get(1..).unwrap_or(&[])
    }

    pub fn header(&self) -> PacketHeader {
        PacketHeader {
            control: self.control,
            sequence: self.sequence,
            length: self.data.len() as u16,
        }
    }

    /// Whether further fragments follow this one
    pub fn has_more_fragments(&self, signal: FragmentSignal) -> bool {
        self.header().has_more_fragments(signal)
    }

    /// Encode to wire bytes including the trailing CRC
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(HEADER_LENGTH + self.data.len() + CRC_LENGTH);
        buf.put_slice(&self.header().to_bytes());
        buf.put_slice(&self.data);
        let crc = crc16(&buf);
        buf.put_u16_le(crc);
        buf.to_vec()
    }

    /// Decode a complete packet
    ///
    /// # Errors
    /// - `BadFraming` on a short buffer, wrong start byte or length mismatch
    /// - `CrcMismatch` if the trailing CRC does not match
    pub fn decode(frame: &[u8]) -> C1218Result<Self> {
        if frame.len() < HEADER_LENGTH + CRC_LENGTH {
            return Err(C1218Error::BadFraming(format!(
                "Packet too short: {} bytes",
                frame.len()
            )));
        }
        let mut header_bytes = [0u8; HEADER_LENGTH];
        header_bytes.copy_from_slice(&frame[..HEADER_LENGTH]);
        let header = PacketHeader::parse(&header_bytes)?;

        let expected_len = HEADER_LENGTH + header.length as usize + CRC_LENGTH;
        if frame.len() != expected_len {
            return Err(C1218Error::BadFraming(format!(
                "Length mismatch: header declares {} data bytes, packet is {} bytes",
                header.length,
                frame.len()
            )));
        }

        let crc_start = expected_len - CRC_LENGTH;
        let (body, crc) = frame.split_at(crc_start);
        if !verify_crc(body, crc) {
            return Err(C1218Error::CrcMismatch {
                expected: crc16(body),
                received: u16::from_le_bytes([crc[0], crc[1]]),
            });
        }

        Ok(Self::from_parts(
            header,
            frame[HEADER_LENGTH..crc_start].to_vec(),
        ))
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packet(ctrl=0x{:02X}, seq={}, len={})",
            self.control,
            self.sequence,
            self.data.len()
        )
    }
}

/// Encode a request packet straight to wire bytes
///
/// # Errors
/// Returns `PayloadTooLarge` if the service code plus payload exceed
/// [`MAX_DATA`].
pub fn encode(
    service_code: u8,
    payload: &[u8],
    control_bit: bool,
    sequence: u8,
) -> C1218Result<Vec<u8>> {
    Ok(Packet::request(service_code, payload, control_bit, sequence)?.encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ident() {
        assert_eq!(
            encode(0x20, &[], false, 0).unwrap(),
            vec![0xEE, 0x00, 0x00, 0x00, 0x00, 0x01, 0x20, 0x13, 0x10]
        );
        assert_eq!(
            encode(0x20, &[], true, 0).unwrap(),
            vec![0xEE, 0x00, 0x20, 0x00, 0x00, 0x01, 0x20, 0x82, 0x70]
        );
    }

    #[test]
    fn test_encode_full_read() {
        assert_eq!(
            encode(0x30, &[0x00, 0x01], false, 0).unwrap(),
            vec![0xEE, 0x00, 0x00, 0x00, 0x00, 0x03, 0x30, 0x00, 0x01, 0x55, 0x0D]
        );
    }

    #[test]
    fn test_decode_response() {
        let frame = [
            0xEE, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x03, 0x01, 0x02, 0x03, 0xFA, 0x42,
            0xB5,
        ];
        let packet = Packet::decode(&frame).unwrap();
        assert_eq!(packet.control(), 0x00);
        assert_eq!(packet.sequence(), 0);
        assert_eq!(packet.service_code(), Some(0x00));
        assert_eq!(packet.body(), &[0x00, 0x03, 0x01, 0x02, 0x03, 0xFA]);
    }

    #[test]
    fn test_round_trip() {
        for (code, payload, bit, seq) in [
            (0x20u8, vec![], false, 0u8),
            (0x30, vec![0x00, 0x07], true, 0),
            (0x40, vec![0xAB; 300], false, 3),
            (0x4F, vec![0x55; MAX_DATA - 1], true, 0),
        ] {
            let wire = encode(code, &payload, bit, seq).unwrap();
            let packet = Packet::decode(&wire).unwrap();
            assert_eq!(packet.service_code(), Some(code));
            assert_eq!(packet.body(), payload.as_slice());
            assert_eq!(packet.control_bit(), bit);
            assert_eq!(packet.sequence(), seq);
        }
    }

    #[test]
    fn test_payload_too_large() {
        let err = encode(0x40, &vec![0u8; MAX_DATA], false, 0).unwrap_err();
        assert!(matches!(
            err,
            C1218Error::PayloadTooLarge { len: 8184, max: 8183 }
        ));
    }

    #[test]
    fn test_decode_bad_stp() {
        let frame = [0xEF, 0x00, 0x00, 0x00, 0x00, 0x01, 0x20, 0x13, 0x10];
        assert!(matches!(
            Packet::decode(&frame),
            Err(C1218Error::BadFraming(_))
        ));
    }

    #[test]
    fn test_decode_crc_mismatch() {
        let frame = [0xEE, 0x00, 0x00, 0x00, 0x00, 0x01, 0x20, 0x13, 0x11];
        match Packet::decode(&frame) {
            Err(C1218Error::CrcMismatch { expected, received }) => {
                assert_eq!(expected, 0x1013);
                assert_eq!(received, 0x1113);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_length_mismatch() {
        let frame = [0xEE, 0x00, 0x00, 0x00, 0x00, 0x02, 0x20, 0x13, 0x10];
        assert!(matches!(
            Packet::decode(&frame),
            Err(C1218Error::BadFraming(_))
        ));
    }

    #[test]
    fn test_header_fragment_signal() {
        let header = PacketHeader::parse(&[0xEE, 0x00, 0x01, 0x00, 0x00, 0x02]).unwrap();
        assert!(header.has_more_fragments(FragmentSignal::ControlLowBit));
        assert!(!header.has_more_fragments(FragmentSignal::SequenceNonZero));

        let header = PacketHeader::parse(&[0xEE, 0x00, 0x00, 0x02, 0x00, 0x02]).unwrap();
        assert!(!header.has_more_fragments(FragmentSignal::ControlLowBit));
        assert!(header.has_more_fragments(FragmentSignal::SequenceNonZero));
    }

    #[test]
    fn test_header_length_limit() {
        assert!(PacketHeader::parse(&[0xEE, 0x00, 0x00, 0x00, 0x1F, 0xF8]).is_err());
        assert!(PacketHeader::parse(&[0xEE, 0x00, 0x00, 0x00, 0x1F, 0xF7]).is_ok());
    }
}
