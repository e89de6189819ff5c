//! SPI command bus
//!
//! Every ENC28J60 command is a single chip-select assertion: an opcode byte
//! carrying a 3-bit command and a 5-bit register address, followed by the
//! argument or data bytes. [`ControlBus`] maps each command to one
//! [`SpiDevice::transaction`], so the SPI implementation toggles
//! chip-select around every call.
//!
//! | Command | Opcode | Argument |
//! |---------|--------|----------|
//! | Read Control Register | `000a aaaa` | - |
//! | Read Buffer Memory | `0011 1010` | - |
//! | Write Control Register | `010a aaaa` | data |
//! | Write Buffer Memory | `0111 1010` | data |
//! | Bit Field Set | `100a aaaa` | mask |
//! | Bit Field Clear | `101a aaaa` | mask |
//! | System Reset | `1111 1111` | - |

use embedded_hal::spi::{Error as _, Operation, SpiDevice};

use super::bank::Bank;
use crate::driver::error::{BusError, Result};
use crate::internal::constants::DEFAULT_POLL_LIMIT;
use crate::internal::register::{ADDR_MASK, Register};

// =============================================================================
// Opcodes
// =============================================================================

/// Read Control Register
pub const OP_RCR: u8 = 0x00;
/// Read Buffer Memory
pub const OP_RBM: u8 = 0x3A;
/// Write Control Register
pub const OP_WCR: u8 = 0x40;
/// Write Buffer Memory
pub const OP_WBM: u8 = 0x7A;
/// Bit Field Set
pub const OP_BFS: u8 = 0x80;
/// Bit Field Clear
pub const OP_BFC: u8 = 0xA0;
/// System Reset Command
pub const OP_SRC: u8 = 0xFF;

// =============================================================================
// Control Bus
// =============================================================================

/// Command-level access to the controller over SPI
///
/// Owns the [`SpiDevice`] and remembers which register bank is selected so
/// bank switches are only sent when needed.
#[derive(Debug)]
pub struct ControlBus<SPI> {
    spi: SPI,
    bank: Bank,
    poll_limit: u32,
}

impl<SPI> ControlBus<SPI> {
    /// Wrap an SPI device
    ///
    /// Assumes bank 0 is selected, which holds after power-on and after
    /// [`ControlBus::system_reset`].
    pub const fn new(spi: SPI) -> Self {
        Self {
            spi,
            bank: Bank::Bank0,
            poll_limit: DEFAULT_POLL_LIMIT,
        }
    }

    /// Currently selected register bank
    #[inline(always)]
    pub fn current_bank(&self) -> Bank {
        self.bank
    }

    /// Iteration budget for [`ControlBus::poll`]
    pub fn poll_limit(&self) -> u32 {
        self.poll_limit
    }

    /// Set the iteration budget for [`ControlBus::poll`]
    pub fn set_poll_limit(&mut self, limit: u32) {
        self.poll_limit = limit.max(1);
    }

    /// Give the SPI device back
    pub fn release(self) -> SPI {
        self.spi
    }

    #[inline(always)]
    pub(crate) fn note_bank(&mut self, bank: Bank) {
        self.bank = bank;
    }
}

impl<SPI: SpiDevice> ControlBus<SPI> {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<()> {
        self.spi
            .transaction(operations)
            .map_err(|e| BusError::from(e.kind()).into())
    }

    // =========================================================================
    // Raw Commands
    // =========================================================================

    /// Read an ETH-class control register at `addr` in the selected bank
    pub fn read_eth_register(&mut self, addr: u8) -> Result<u8> {
        let mut value = [0u8; 1];
        self.transaction(&mut [
            Operation::Write(&[OP_RCR | (addr & ADDR_MASK)]),
            Operation::Read(&mut value),
        ])?;
        Ok(value[0])
    }

    /// Read a MAC/MII-class control register at `addr` in the selected bank
    ///
    /// These registers shift out a dummy byte before the value.
    pub fn read_mac_register(&mut self, addr: u8) -> Result<u8> {
        let mut value = [0u8; 2];
        self.transaction(&mut [
            Operation::Write(&[OP_RCR | (addr & ADDR_MASK)]),
            Operation::Read(&mut value),
        ])?;
        Ok(value[1])
    }

    /// Write a control register at `addr` in the selected bank
    pub fn write_register(&mut self, addr: u8, value: u8) -> Result<()> {
        self.transaction(&mut [Operation::Write(&[OP_WCR | (addr & ADDR_MASK), value])])
    }

    /// Set the bits of `mask` in an ETH-class register
    pub fn bit_field_set(&mut self, addr: u8, mask: u8) -> Result<()> {
        self.transaction(&mut [Operation::Write(&[OP_BFS | (addr & ADDR_MASK), mask])])
    }

    /// Clear the bits of `mask` in an ETH-class register
    pub fn bit_field_clear(&mut self, addr: u8, mask: u8) -> Result<()> {
        self.transaction(&mut [Operation::Write(&[OP_BFC | (addr & ADDR_MASK), mask])])
    }

    /// Read buffer memory at ERDPT into `buf`
    ///
    /// ERDPT auto-increments and wraps inside the receive ring.
    pub fn read_buffer(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        self.transaction(&mut [Operation::Write(&[OP_RBM]), Operation::Read(buf)])
    }

    /// Write `data` into buffer memory at EWRPT
    pub fn write_buffer(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.transaction(&mut [Operation::Write(&[OP_WBM]), Operation::Write(data)])
    }

    /// Issue the system reset command
    ///
    /// The controller returns to bank 0. The caller must wait for the
    /// oscillator before touching any register.
    pub fn system_reset(&mut self) -> Result<()> {
        self.transaction(&mut [Operation::Write(&[OP_SRC])])?;
        self.bank = Bank::Bank0;
        Ok(())
    }

    // =========================================================================
    // Register Access
    // =========================================================================

    #[inline(always)]
    fn check_bank(&self, reg: Register) {
        debug_assert!(
            reg.bank().is_none_or(|bank| bank == self.bank),
            "register accessed from the wrong bank"
        );
    }

    /// Read a register, using the framing its class requires
    pub(crate) fn read(&mut self, reg: Register) -> Result<u8> {
        self.check_bank(reg);
        if reg.is_mac() {
            self.read_mac_register(reg.address())
        } else {
            self.read_eth_register(reg.address())
        }
    }

    pub(crate) fn write(&mut self, reg: Register, value: u8) -> Result<()> {
        self.check_bank(reg);
        self.write_register(reg.address(), value)
    }

    pub(crate) fn set_bits(&mut self, reg: Register, mask: u8) -> Result<()> {
        self.check_bank(reg);
        debug_assert!(!reg.is_mac(), "bit field commands only work on ETH registers");
        self.bit_field_set(reg.address(), mask)
    }

    pub(crate) fn clear_bits(&mut self, reg: Register, mask: u8) -> Result<()> {
        self.check_bank(reg);
        debug_assert!(!reg.is_mac(), "bit field commands only work on ETH registers");
        self.bit_field_clear(reg.address(), mask)
    }

    /// Read a 16-bit register pair, low byte first
    pub(crate) fn read_u16(&mut self, low: Register) -> Result<u16> {
        let lo = self.read(low)?;
        let hi = self.read(low.high())?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Write a 16-bit register pair, low byte first
    ///
    /// Several pairs (ERXRDPT, MIWR) latch on the high byte write.
    pub(crate) fn write_u16(&mut self, low: Register, value: u16) -> Result<()> {
        let [lo, hi] = value.to_le_bytes();
        self.write(low, lo)?;
        self.write(low.high(), hi)
    }

    /// Poll `reg` until `done(value)` holds or the budget runs out
    ///
    /// Returns `Ok(false)` when the budget is exhausted.
    pub(crate) fn poll(
        &mut self,
        reg: Register,
        limit: u32,
        mut done: impl FnMut(u8) -> bool,
    ) -> Result<bool> {
        for _ in 0..limit {
            if done(self.read(reg)?) {
                return Ok(true);
            }
            core::hint::spin_loop();
        }
        Ok(false)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
