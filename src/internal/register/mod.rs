//! ENC28J60 control register map
//!
//! The control register file is split into four banks of 32 addresses. The
//! top five addresses (`0x1B..=0x1F`) are mapped into every bank; everything
//! else is only reachable after selecting the right bank through
//! `ECON1.BSEL1:BSEL0`.
//!
//! Registers are further divided into two classes that use different read
//! framing on the bus:
//!
//! - **ETH** registers return their value in the first byte clocked out
//!   after the opcode.
//! - **MAC/MII** registers clock out a dummy byte first, so reads need one
//!   extra exchange.
//!
//! [`Register`] packs the 5-bit address, the bank and the class into one
//! value so the bus layer can pick the correct framing and check that the
//! right bank is selected.

pub mod eth;
pub mod mac;

use crate::hal::bank::Bank;

/// 5-bit register address mask used in the opcode byte
pub const ADDR_MASK: u8 = 0x1F;

/// First register address mapped into every bank
pub const COMMON_BASE: u8 = 0x1B;

const BANK_SHIFT: u16 = 8;
const BANK_MASK: u16 = 0x3 << BANK_SHIFT;
const MAC_FLAG: u16 = 1 << 12;
const COMMON_FLAG: u16 = 1 << 13;

/// A control register: address, bank and access class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register(u16);

impl Register {
    /// ETH-class register in a specific bank
    pub const fn eth(bank: Bank, addr: u8) -> Self {
        Self(((bank as u16) << BANK_SHIFT) | (addr & ADDR_MASK) as u16)
    }

    /// MAC/MII-class register in a specific bank (needs a dummy read byte)
    pub const fn mac(bank: Bank, addr: u8) -> Self {
        Self(((bank as u16) << BANK_SHIFT) | MAC_FLAG | (addr & ADDR_MASK) as u16)
    }

    /// ETH-class register mapped into every bank
    pub const fn common(addr: u8) -> Self {
        Self(COMMON_FLAG | (addr & ADDR_MASK) as u16)
    }

    /// 5-bit address used in the opcode
    #[inline(always)]
    pub const fn address(self) -> u8 {
        (self.0 as u8) & ADDR_MASK
    }

    /// Bank that must be selected to reach this register
    ///
    /// Returns `None` for registers visible from every bank.
    pub const fn bank(self) -> Option<Bank> {
        if self.0 & COMMON_FLAG != 0 {
            return None;
        }
        Some(Bank::from_bits(((self.0 & BANK_MASK) >> BANK_SHIFT) as u8))
    }

    /// Whether reads need the extra MAC/MII dummy byte
    #[inline(always)]
    pub const fn is_mac(self) -> bool {
        self.0 & MAC_FLAG != 0
    }

    /// The high byte partner of a 16-bit register pair
    ///
    /// All 16-bit pointers on the chip are stored low byte first at
    /// consecutive addresses.
    pub const fn high(self) -> Self {
        Self((self.0 & !(ADDR_MASK as u16)) | ((self.address() + 1) & ADDR_MASK) as u16)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
