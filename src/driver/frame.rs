//! Frame metadata: EtherType classification, receive preamble and
//! transmit status vector
//!
//! # Receive preamble
//!
//! The controller prepends 6 bytes to every frame it stores in the ring:
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 0-1 | Next packet pointer, little-endian |
//! | 2-5 | Receive status vector, little-endian |
//!
//! followed by the Ethernet header (destination, source, EtherType in
//! network byte order).

use crate::internal::constants::{CRC_SIZE, ETH_HEADER_SIZE, PREAMBLE_SIZE, TX_STATUS_SIZE};

// =============================================================================
// EtherType
// =============================================================================

/// High byte shared by the EtherTypes the driver classifies
pub const ETHER_TYPE_HIGH: u8 = 0x08;

/// EtherType classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EtherType {
    /// IPv4 (0x0800)
    Ip,
    /// ARP (0x0806)
    Arp,
    /// Anything else
    Unknown,
}

impl EtherType {
    /// Classify a host-order EtherType
    pub const fn from_raw(value: u16) -> Self {
        let [high, low] = value.to_be_bytes();
        match (high, low) {
            (ETHER_TYPE_HIGH, 0x00) => EtherType::Ip,
            (ETHER_TYPE_HIGH, 0x06) => EtherType::Arp,
            _ => EtherType::Unknown,
        }
    }

    /// Low byte written after [`ETHER_TYPE_HIGH`], if the type can be sent
    pub const fn low_byte(self) -> Option<u8> {
        match self {
            EtherType::Ip => Some(0x00),
            EtherType::Arp => Some(0x06),
            EtherType::Unknown => None,
        }
    }

    /// Host-order value, if the type can be sent
    pub const fn to_raw(self) -> Option<u16> {
        match self.low_byte() {
            Some(low) => Some(u16::from_be_bytes([ETHER_TYPE_HIGH, low])),
            None => None,
        }
    }
}

// =============================================================================
// Receive Status Vector
// =============================================================================

/// Receive status vector bits
pub mod rsv {
    /// Long event / drop event
    pub const LONG_EVENT: u32 = 1 << 16;
    /// Carrier event seen since the last receive
    pub const CARRIER_EVENT: u32 = 1 << 18;
    /// CRC error
    pub const CRC_ERROR: u32 = 1 << 20;
    /// Length check error
    pub const LENGTH_CHECK_ERROR: u32 = 1 << 21;
    /// Length out of range
    pub const LENGTH_OUT_OF_RANGE: u32 = 1 << 22;
    /// Received OK
    pub const RECEIVED_OK: u32 = 1 << 23;
    /// Multicast destination
    pub const MULTICAST: u32 = 1 << 24;
    /// Broadcast destination
    pub const BROADCAST: u32 = 1 << 25;
    /// Control frame
    pub const CONTROL_FRAME: u32 = 1 << 27;
    /// VLAN tagged
    pub const VLAN: u32 = 1 << 30;
    /// Always zero on a valid vector
    pub const ZERO: u32 = 1 << 31;
    /// Received byte count (includes CRC)
    pub const BYTE_COUNT_MASK: u32 = 0xFFFF;
}

/// Decoded receive status vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxStatus(u32);

impl RxStatus {
    /// Wrap a raw status vector
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw 32-bit vector
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Received bytes including CRC
    pub const fn byte_count(self) -> u16 {
        (self.0 & rsv::BYTE_COUNT_MASK) as u16
    }

    /// Frame passed all checks
    pub const fn received_ok(self) -> bool {
        self.0 & rsv::RECEIVED_OK != 0
    }

    /// CRC did not match
    pub const fn crc_error(self) -> bool {
        self.0 & rsv::CRC_ERROR != 0
    }

    /// Type/length field did not match the frame size
    pub const fn length_check_error(self) -> bool {
        self.0 & rsv::LENGTH_CHECK_ERROR != 0
    }

    /// Destination was a multicast address
    pub const fn is_multicast(self) -> bool {
        self.0 & rsv::MULTICAST != 0
    }

    /// Destination was the broadcast address
    pub const fn is_broadcast(self) -> bool {
        self.0 & rsv::BROADCAST != 0
    }

    /// The reserved zero bit is clear
    pub const fn zero_bit_clear(self) -> bool {
        self.0 & rsv::ZERO == 0
    }
}

// =============================================================================
// Receive Header
// =============================================================================

/// Everything the controller stored in front of a received frame's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxHeader {
    /// Buffer address of the following packet
    pub next_packet: u16,
    /// Receive status vector
    pub status: RxStatus,
    /// Destination MAC address
    pub destination: [u8; 6],
    /// Source MAC address
    pub source: [u8; 6],
    /// Classified EtherType
    pub ether_type: EtherType,
    /// EtherType in host byte order
    pub raw_ether_type: u16,
}

impl RxHeader {
    /// Decode a preamble read from the ring
    pub fn parse(preamble: &[u8; PREAMBLE_SIZE]) -> Self {
        let mut destination = [0u8; 6];
        let mut source = [0u8; 6];
        destination.copy_from_slice(&preamble[6..12]);
        source.copy_from_slice(&preamble[12..18]);
        let raw_ether_type = u16::from_be_bytes([preamble[18], preamble[19]]);

        Self {
            next_packet: u16::from_le_bytes([preamble[0], preamble[1]]),
            status: RxStatus::from_raw(u32::from_le_bytes([
                preamble[2],
                preamble[3],
                preamble[4],
                preamble[5],
            ])),
            destination,
            source,
            ether_type: EtherType::from_raw(raw_ether_type),
            raw_ether_type,
        }
    }

    /// Frame length without the CRC, Ethernet header included
    pub const fn frame_len(&self) -> usize {
        (self.status.byte_count() as usize).saturating_sub(CRC_SIZE)
    }

    /// Bytes following the Ethernet header, CRC excluded
    pub const fn payload_len(&self) -> usize {
        self.frame_len().saturating_sub(ETH_HEADER_SIZE)
    }
}

// =============================================================================
// Transmit Status Vector
// =============================================================================

/// Transmit status vector written after the last frame byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxStatus([u8; TX_STATUS_SIZE]);

impl TxStatus {
    const COLLISION_SHIFT: u32 = 16;
    const CRC_ERROR: u32 = 1 << 20;
    const LENGTH_CHECK_ERROR: u32 = 1 << 21;
    const DONE: u32 = 1 << 23;
    const MULTICAST: u32 = 1 << 24;
    const BROADCAST: u32 = 1 << 25;
    const EXCESSIVE_DEFER: u32 = 1 << 27;
    const EXCESSIVE_COLLISION: u32 = 1 << 28;
    const LATE_COLLISION: u32 = 1 << 29;
    const GIANT: u32 = 1 << 30;

    /// Wrap the raw 7-byte vector
    pub const fn from_bytes(bytes: [u8; TX_STATUS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw bytes
    pub const fn as_bytes(&self) -> &[u8; TX_STATUS_SIZE] {
        &self.0
    }

    const fn low(&self) -> u32 {
        u32::from_le_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Bytes in the frame, padding and CRC included
    pub const fn byte_count(&self) -> u16 {
        u16::from_le_bytes([self.0[0], self.0[1]])
    }

    /// Collisions seen while sending
    pub const fn collision_count(&self) -> u8 {
        ((self.low() >> Self::COLLISION_SHIFT) & 0x0F) as u8
    }

    /// Transmission completed successfully
    pub const fn done(&self) -> bool {
        self.low() & Self::DONE != 0
    }

    /// Collision after the collision window
    pub const fn late_collision(&self) -> bool {
        self.low() & Self::LATE_COLLISION != 0
    }

    /// Aborted after too many collisions
    pub const fn excessive_collision(&self) -> bool {
        self.low() & Self::EXCESSIVE_COLLISION != 0
    }

    /// Deferred longer than allowed
    pub const fn excessive_defer(&self) -> bool {
        self.low() & Self::EXCESSIVE_DEFER != 0
    }

    /// CRC mismatch
    pub const fn crc_error(&self) -> bool {
        self.low() & Self::CRC_ERROR != 0
    }

    /// Length check failed
    pub const fn length_check_error(&self) -> bool {
        self.low() & Self::LENGTH_CHECK_ERROR != 0
    }

    /// Frame exceeded MAMXFL
    pub const fn giant(&self) -> bool {
        self.low() & Self::GIANT != 0
    }

    /// Sent to a multicast address
    pub const fn is_multicast(&self) -> bool {
        self.low() & Self::MULTICAST != 0
    }

    /// Sent to the broadcast address
    pub const fn is_broadcast(&self) -> bool {
        self.low() & Self::BROADCAST != 0
    }

    /// Bytes put on the wire including aborted attempts
    pub const fn total_bytes_on_wire(&self) -> u16 {
        u16::from_le_bytes([self.0[4], self.0[5]])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ether_type_classification() {
        assert_eq!(EtherType::from_raw(0x0800), EtherType::Ip);
        assert_eq!(EtherType::from_raw(0x0806), EtherType::Arp);
        assert_eq!(EtherType::from_raw(0x86DD), EtherType::Unknown);
        assert_eq!(EtherType::from_raw(0x0801), EtherType::Unknown);
        assert_eq!(EtherType::from_raw(0x0608), EtherType::Unknown);
    }

    #[test]
    fn ether_type_raw_values() {
        assert_eq!(EtherType::Ip.to_raw(), Some(0x0800));
        assert_eq!(EtherType::Arp.to_raw(), Some(0x0806));
        assert_eq!(EtherType::Unknown.to_raw(), None);
    }

    #[test]
    fn parse_preamble() {
        let mut preamble = [0u8; PREAMBLE_SIZE];
        preamble[0..2].copy_from_slice(&0x0142u16.to_le_bytes());
        let status = 64 | rsv::RECEIVED_OK | rsv::BROADCAST;
        preamble[2..6].copy_from_slice(&status.to_le_bytes());
        preamble[6..12].copy_from_slice(&[0xFF; 6]);
        preamble[12..18].copy_from_slice(&[0x02, 0x11, 0x22, 0x33, 0x44, 0x55]);
        preamble[18] = 0x08;
        preamble[19] = 0x06;

        let header = RxHeader::parse(&preamble);
        assert_eq!(header.next_packet, 0x0142);
        assert_eq!(header.status.byte_count(), 64);
        assert!(header.status.received_ok());
        assert!(header.status.is_broadcast());
        assert!(!header.status.is_multicast());
        assert!(header.status.zero_bit_clear());
        assert_eq!(header.destination, [0xFF; 6]);
        assert_eq!(header.source, [0x02, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(header.ether_type, EtherType::Arp);
        assert_eq!(header.raw_ether_type, 0x0806);
        assert_eq!(header.frame_len(), 60);
        assert_eq!(header.payload_len(), 46);
    }

    #[test]
    fn runt_lengths_saturate() {
        let mut preamble = [0u8; PREAMBLE_SIZE];
        preamble[2] = 3;
        let header = RxHeader::parse(&preamble);
        assert_eq!(header.frame_len(), 0);
        assert_eq!(header.payload_len(), 0);
    }

    #[test]
    fn tx_status_bits() {
        // 60 bytes, 2 collisions, done
        let status = TxStatus::from_bytes([60, 0, 0x82, 0, 124, 0, 0]);
        assert_eq!(status.byte_count(), 60);
        assert_eq!(status.collision_count(), 2);
        assert!(status.done());
        assert!(!status.late_collision());
        assert_eq!(status.total_bytes_on_wire(), 124);

        let status = TxStatus::from_bytes([60, 0, 0, 0x20, 0, 0, 0]);
        assert!(status.late_collision());
        assert!(!status.done());
    }
}
