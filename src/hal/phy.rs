//! PHY indirect access
//!
//! The PHY registers sit behind the MII management interface:
//!
//! - **Read**: write the PHY address to MIREGADR, set MICMD.MIIRD, wait for
//!   MISTAT.BUSY to clear, clear MICMD.MIIRD, then read MIRDL and MIRDH.
//! - **Write**: write the PHY address to MIREGADR, then MIWRL and MIWRH.
//!   The write starts on MIWRH; wait for MISTAT.BUSY to clear.
//!
//! MICMD/MIREGADR/MIWR/MIRD live in bank 2 and MISTAT in bank 3. Both
//! operations leave bank 0 selected.

use embedded_hal::spi::SpiDevice;

use super::bank::Bank;
use super::bus::ControlBus;
use crate::driver::config::Duplex;
use crate::driver::error::{IoError, Result};
use crate::internal::phy_regs::{phstat1, phstat2, phy_reg};
use crate::internal::register::mac::{
    MICMD, MIRDL, MIREGADR, MISTAT, MIWRL, micmd, mistat,
};

// =============================================================================
// Link Status
// =============================================================================

/// Live link state reported by PHSTAT2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStatus {
    /// Link is currently up
    pub up: bool,
    /// Duplex the PHY is configured for
    pub duplex: Duplex,
}

impl LinkStatus {
    /// Decode from a PHSTAT2 value
    pub const fn from_phstat2(value: u16) -> Self {
        Self {
            up: value & phstat2::LSTAT != 0,
            duplex: if value & phstat2::DPXSTAT != 0 {
                Duplex::Full
            } else {
                Duplex::Half
            },
        }
    }
}

// =============================================================================
// PHY Access
// =============================================================================

impl<SPI: SpiDevice> ControlBus<SPI> {
    fn wait_mii_idle(&mut self) -> Result<()> {
        self.select_bank(Bank::Bank3)?;
        let limit = self.poll_limit();
        if self.poll(MISTAT, limit, |v| v & mistat::BUSY == 0)? {
            Ok(())
        } else {
            Err(IoError::PhyError.into())
        }
    }

    /// Read a 16-bit PHY register
    ///
    /// Fails with [`IoError::PhyError`] if the MII interface stays busy.
    pub fn read_phy(&mut self, addr: u8) -> Result<u16> {
        self.with_bank(Bank::Bank2, |bus| {
            bus.write(MIREGADR, addr)?;
            bus.write(MICMD, micmd::MIIRD)?;
            let waited = bus.wait_mii_idle();
            bus.select_bank(Bank::Bank2)?;
            bus.write(MICMD, 0)?;
            waited?;
            bus.read_u16(MIRDL)
        })
    }

    /// Write a 16-bit PHY register
    pub fn write_phy(&mut self, addr: u8, value: u16) -> Result<()> {
        self.with_bank(Bank::Bank2, |bus| {
            bus.write(MIREGADR, addr)?;
            bus.write_u16(MIWRL, value)?;
            bus.wait_mii_idle()
        })
    }

    /// Latched link state
    ///
    /// PHSTAT1.LLSTAT clears when the link drops and stays clear until it
    /// is read, so this returns `false` if the link went down at any point
    /// since the previous call.
    pub fn is_linked(&mut self) -> Result<bool> {
        Ok(self.read_phy(phy_reg::PHSTAT1)? & phstat1::LLSTAT != 0)
    }

    /// Live link state and duplex
    pub fn link_status(&mut self) -> Result<LinkStatus> {
        Ok(LinkStatus::from_phstat2(self.read_phy(phy_reg::PHSTAT2)?))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
