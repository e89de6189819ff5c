//! ENC28J60 PHY Register Definitions
//!
//! The PHY registers are 16 bits wide and are not part of the control
//! register file. They are reached indirectly through the MII management
//! registers (`MIREGADR`, `MICMD`, `MIWRL/H`, `MIRDL/H`, `MISTAT`).
//!
//! | Register | Address | Description |
//! |----------|---------|-------------|
//! | PHCON1 | 0x00 | PHY control 1 |
//! | PHSTAT1 | 0x01 | PHY status 1 (latching link) |
//! | PHID1 | 0x02 | PHY identifier 1 |
//! | PHID2 | 0x03 | PHY identifier 2 |
//! | PHCON2 | 0x10 | PHY control 2 |
//! | PHSTAT2 | 0x11 | PHY status 2 (live link) |
//! | PHIE | 0x12 | PHY interrupt enable |
//! | PHIR | 0x13 | PHY interrupt request |
//! | PHLCON | 0x14 | LED configuration |

#![allow(dead_code)]

/// PHY register addresses
pub mod phy_reg {
    /// PHY control 1
    pub const PHCON1: u8 = 0x00;
    /// PHY status 1
    pub const PHSTAT1: u8 = 0x01;
    /// PHY identifier 1
    pub const PHID1: u8 = 0x02;
    /// PHY identifier 2
    pub const PHID2: u8 = 0x03;
    /// PHY control 2
    pub const PHCON2: u8 = 0x10;
    /// PHY status 2
    pub const PHSTAT2: u8 = 0x11;
    /// PHY interrupt enable
    pub const PHIE: u8 = 0x12;
    /// PHY interrupt request
    pub const PHIR: u8 = 0x13;
    /// LED configuration
    pub const PHLCON: u8 = 0x14;
}

/// PHCON1 bit definitions
pub mod phcon1 {
    /// PHY software reset
    pub const PRST: u16 = 1 << 15;
    /// PHY loopback
    pub const PLOOPBK: u16 = 1 << 14;
    /// PHY power down
    pub const PPWRSV: u16 = 1 << 11;
    /// PHY duplex mode (full duplex if set)
    pub const PDPXMD: u16 = 1 << 8;
}

/// PHSTAT1 bit definitions
pub mod phstat1 {
    /// Full duplex capable
    pub const PFDPX: u16 = 1 << 12;
    /// Half duplex capable
    pub const PHDPX: u16 = 1 << 11;
    /// Latching link status (stays low until read once the link dropped)
    pub const LLSTAT: u16 = 1 << 2;
    /// Latching jabber status
    pub const JBSTAT: u16 = 1 << 1;
}

/// PHCON2 bit definitions
pub mod phcon2 {
    /// Force link up
    pub const FRCLNK: u16 = 1 << 14;
    /// Twisted pair transmitter disable
    pub const TXDIS: u16 = 1 << 13;
    /// Jabber correction disable
    pub const JABBER: u16 = 1 << 10;
    /// Half duplex loopback disable
    pub const HDLDIS: u16 = 1 << 8;
}

/// PHSTAT2 bit definitions
pub mod phstat2 {
    /// Transmitting
    pub const TXSTAT: u16 = 1 << 13;
    /// Receiving
    pub const RXSTAT: u16 = 1 << 12;
    /// Collision
    pub const COLSTAT: u16 = 1 << 11;
    /// Live link status
    pub const LSTAT: u16 = 1 << 10;
    /// Configured duplex (full if set)
    pub const DPXSTAT: u16 = 1 << 9;
    /// Polarity reversed
    pub const PLRITY: u16 = 1 << 5;
}

/// PHIE bit definitions
pub mod phie {
    /// Link change interrupt enable
    pub const PLNKIE: u16 = 1 << 4;
    /// Global PHY interrupt enable
    pub const PGEIE: u16 = 1 << 1;
}

/// Expected PHID1 value
pub const PHID1_VALUE: u16 = 0x0083;
/// Expected PHID2 value with the revision nibble masked off
pub const PHID2_VALUE: u16 = 0x1400;
/// Mask applied to PHID2 before comparison
pub const PHID2_MASK: u16 = 0xFC00;
