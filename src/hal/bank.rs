//! Control register bank selection
//!
//! Bank 0 holds the buffer pointers used by every receive and transmit
//! operation, so the driver keeps it selected between calls. Anything that
//! needs another bank goes through [`ControlBus::with_bank`], which switches
//! back to bank 0 on every exit path, errors included.

use embedded_hal::spi::SpiDevice;

use super::bus::ControlBus;
use crate::driver::error::Result;
use crate::internal::register::eth::{ECON1, econ1};

/// Control register bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Bank {
    /// Buffer pointers, DMA
    #[default]
    Bank0 = 0,
    /// Hash table, pattern match, receive filter, packet count
    Bank1 = 1,
    /// MAC configuration, MII interface
    Bank2 = 2,
    /// Station address, MII status, revision, clock out
    Bank3 = 3,
}

impl Bank {
    /// Decode from the two BSEL bits
    pub const fn from_bits(bits: u8) -> Self {
        match bits & econ1::BSEL_MASK {
            0 => Bank::Bank0,
            1 => Bank::Bank1,
            2 => Bank::Bank2,
            _ => Bank::Bank3,
        }
    }

    /// Value of ECON1.BSEL1:BSEL0 for this bank
    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

impl<SPI: SpiDevice> ControlBus<SPI> {
    /// Select a register bank
    ///
    /// Clears both BSEL bits, then sets the ones for `bank`. Skipped when
    /// `bank` is already selected.
    pub fn select_bank(&mut self, bank: Bank) -> Result<()> {
        if self.current_bank() == bank {
            return Ok(());
        }
        self.bit_field_clear(ECON1.address(), econ1::BSEL_MASK)?;
        self.note_bank(Bank::Bank0);
        if bank.bits() != 0 {
            self.bit_field_set(ECON1.address(), bank.bits())?;
            self.note_bank(bank);
        }
        Ok(())
    }

    /// Run `f` with `bank` selected and bank 0 restored afterwards
    ///
    /// `f` may switch banks itself. The first error wins: a failure inside
    /// `f` is reported even if restoring bank 0 fails too.
    pub fn with_bank<T>(
        &mut self,
        bank: Bank,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let result = match self.select_bank(bank) {
            Ok(()) => f(self),
            Err(e) => Err(e),
        };
        let restored = self.select_bank(Bank::Bank0);
        match (result, restored) {
            (Ok(value), Ok(())) => Ok(value),
            (Err(e), _) | (Ok(_), Err(e)) => Err(e),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
