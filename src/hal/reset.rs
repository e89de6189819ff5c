//! Reset Controller HAL
//!
//! Brings the controller out of power save and issues the system reset
//! command, then waits for the oscillator start-up timer.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use super::bus::ControlBus;
use crate::driver::error::{ConfigError, Result};
use crate::internal::constants::RESET_DELAY_US;
use crate::internal::register::eth::{ECON2, ESTAT, econ2, estat};

/// Poll interval while waiting for CLKRDY in microseconds
const CLKRDY_POLL_US: u32 = 10;

// =============================================================================
// Reset Controller
// =============================================================================

/// Reset controller for the ENC28J60
#[derive(Debug)]
pub struct ResetController<D: DelayNs> {
    delay: D,
}

impl<D: DelayNs> ResetController<D> {
    /// Create a new reset controller
    pub fn new(delay: D) -> Self {
        Self { delay }
    }

    /// Full reset sequence
    ///
    /// 1. Leave power save (ECON2.PWRSV) so the oscillator runs
    /// 2. Issue the system reset command
    /// 3. Wait until ESTAT.CLKRDY is set and the unimplemented bit 3 reads 0
    ///
    /// Fails with [`ConfigError::ResetFailed`] if the clock never becomes
    /// ready within the bus poll budget.
    pub fn reset<SPI: SpiDevice>(&mut self, bus: &mut ControlBus<SPI>) -> Result<()> {
        bus.clear_bits(ECON2, econ2::PWRSV)?;
        self.delay.delay_us(RESET_DELAY_US);
        bus.system_reset()?;
        self.delay.delay_us(RESET_DELAY_US);
        self.wait_clock_ready(bus)
    }

    /// Wait for the oscillator start-up timer
    pub fn wait_clock_ready<SPI: SpiDevice>(&mut self, bus: &mut ControlBus<SPI>) -> Result<()> {
        for _ in 0..bus.poll_limit() {
            let status = bus.read(ESTAT)?;
            if status & estat::CLKRDY != 0 && status & estat::UNIMPLEMENTED == 0 {
                return Ok(());
            }
            self.delay.delay_us(CLKRDY_POLL_US);
        }
        Err(ConfigError::ResetFailed.into())
    }

    /// Give the delay provider back
    pub fn release(self) -> D {
        self.delay
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
