//! MAC/MII-class control registers and bit definitions
//!
//! Every register here clocks out a dummy byte before its value on a read.

#![allow(dead_code)]

use super::Register;
use crate::hal::bank::Bank;

// =============================================================================
// Bank 2 - MAC configuration and MII interface
// =============================================================================

/// MAC control 1
pub const MACON1: Register = Register::mac(Bank::Bank2, 0x00);
/// MAC control 3
pub const MACON3: Register = Register::mac(Bank::Bank2, 0x02);
/// MAC control 4
pub const MACON4: Register = Register::mac(Bank::Bank2, 0x03);
/// Back-to-back inter-packet gap
pub const MABBIPG: Register = Register::mac(Bank::Bank2, 0x04);
/// Non-back-to-back inter-packet gap, low byte
pub const MAIPGL: Register = Register::mac(Bank::Bank2, 0x06);
/// Non-back-to-back inter-packet gap, high byte
pub const MAIPGH: Register = Register::mac(Bank::Bank2, 0x07);
/// Retransmission maximum
pub const MACLCON1: Register = Register::mac(Bank::Bank2, 0x08);
/// Collision window
pub const MACLCON2: Register = Register::mac(Bank::Bank2, 0x09);
/// Maximum frame length, low byte
pub const MAMXFLL: Register = Register::mac(Bank::Bank2, 0x0A);
/// Maximum frame length, high byte
pub const MAMXFLH: Register = Register::mac(Bank::Bank2, 0x0B);
/// MII command
pub const MICMD: Register = Register::mac(Bank::Bank2, 0x12);
/// MII (PHY) register address
pub const MIREGADR: Register = Register::mac(Bank::Bank2, 0x14);
/// MII write data, low byte
pub const MIWRL: Register = Register::mac(Bank::Bank2, 0x16);
/// MII write data, high byte (writing it starts the PHY write)
pub const MIWRH: Register = Register::mac(Bank::Bank2, 0x17);
/// MII read data, low byte
pub const MIRDL: Register = Register::mac(Bank::Bank2, 0x18);
/// MII read data, high byte
pub const MIRDH: Register = Register::mac(Bank::Bank2, 0x19);

// =============================================================================
// Bank 3 - Station address and MII status
// =============================================================================

/// MAC address byte 5 (second to last on the wire)
pub const MAADR5: Register = Register::mac(Bank::Bank3, 0x00);
/// MAC address byte 6 (last on the wire)
pub const MAADR6: Register = Register::mac(Bank::Bank3, 0x01);
/// MAC address byte 3
pub const MAADR3: Register = Register::mac(Bank::Bank3, 0x02);
/// MAC address byte 4
pub const MAADR4: Register = Register::mac(Bank::Bank3, 0x03);
/// MAC address byte 1 (first on the wire)
pub const MAADR1: Register = Register::mac(Bank::Bank3, 0x04);
/// MAC address byte 2
pub const MAADR2: Register = Register::mac(Bank::Bank3, 0x05);
/// MII status
pub const MISTAT: Register = Register::mac(Bank::Bank3, 0x0A);

/// MAC address registers in wire order (MAADR1..MAADR6)
pub const MAADR: [Register; 6] = [MAADR1, MAADR2, MAADR3, MAADR4, MAADR5, MAADR6];

// =============================================================================
// Bit definitions
// =============================================================================

/// MACON1 bit definitions
pub mod macon1 {
    /// Pause control frame transmission enable
    pub const TXPAUS: u8 = 1 << 3;
    /// Pause control frame reception enable
    pub const RXPAUS: u8 = 1 << 2;
    /// Pass all received control frames
    pub const PASSALL: u8 = 1 << 1;
    /// MAC receive enable
    pub const MARXEN: u8 = 1 << 0;
}

/// MACON3 bit definitions
pub mod macon3 {
    /// Pad / CRC configuration bit 2
    pub const PADCFG2: u8 = 1 << 7;
    /// Pad / CRC configuration bit 1
    pub const PADCFG1: u8 = 1 << 6;
    /// Pad / CRC configuration bit 0 (pad short frames to 60 bytes)
    pub const PADCFG0: u8 = 1 << 5;
    /// Transmit CRC enable
    pub const TXCRCEN: u8 = 1 << 4;
    /// Proprietary header enable
    pub const PHDREN: u8 = 1 << 3;
    /// Huge frame enable
    pub const HFRMEN: u8 = 1 << 2;
    /// Frame length checking enable
    pub const FRMLNEN: u8 = 1 << 1;
    /// MAC full-duplex enable
    pub const FULDPX: u8 = 1 << 0;
}

/// MACON4 bit definitions
pub mod macon4 {
    /// Defer transmission indefinitely on a busy medium
    pub const DEFER: u8 = 1 << 6;
    /// No backoff during backpressure
    pub const BPEN: u8 = 1 << 5;
    /// No backoff
    pub const NOBKOFF: u8 = 1 << 4;
}

/// MICMD bit definitions
pub mod micmd {
    /// MII scan enable
    pub const MIISCAN: u8 = 1 << 1;
    /// MII read enable
    pub const MIIRD: u8 = 1 << 0;
}

/// MISTAT bit definitions
pub mod mistat {
    /// MII read data not valid
    pub const NVALID: u8 = 1 << 2;
    /// MII scan in progress
    pub const SCAN: u8 = 1 << 1;
    /// MII management busy
    pub const BUSY: u8 = 1 << 0;
}

/// Back-to-back inter-packet gap for full duplex (9.6 us)
pub const MABBIPG_FULL_DUPLEX: u8 = 0x15;
/// Back-to-back inter-packet gap for half duplex (9.6 us)
pub const MABBIPG_HALF_DUPLEX: u8 = 0x12;
/// Non-back-to-back inter-packet gap, low byte
pub const MAIPGL_DEFAULT: u8 = 0x12;
/// Non-back-to-back inter-packet gap, high byte (half duplex only)
pub const MAIPGH_DEFAULT: u8 = 0x0C;
/// Collision window
///
/// 55 satisfies IEEE 802.3; the larger value makes the B5 link-pulse
/// late-collision errata trigger less often.
pub const MACLCON2_COLLISION_WINDOW: u8 = 63;
