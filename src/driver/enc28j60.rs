//! Core ENC28J60 driver
//!
//! This module contains the main [`Enc28j60`] structure and its lifecycle:
//!
//! - Initialization (reset, buffer layout, MAC, PHY)
//! - Power down and power up
//! - Station address, duplex and clock output changes
//! - Link status
//! - Raw buffer memory access through the read and write pointers
//!
//! Receive, transmit, DMA, filtering and interrupt handling are further
//! `impl` blocks in the sibling modules.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use super::config::{ClockOut, Duplex, Enc28j60Config, Revision, State};
use super::error::{ConfigError, IoError, Result};
use super::ring::RxRing;
use super::rx::RxState;
use crate::hal::{Bank, ControlBus, LinkStatus, ResetController};
use crate::internal::constants::{MAC_ADDR_LEN, TX_CONTROL_BYTE};
use crate::internal::phy_regs::{phcon1, phcon2, phy_reg};
use crate::internal::register::eth::{
    ECOCON, ECON1, ECON2, ERDPTL, EREVID, ERXFCON, ERXNDL, ERXRDPTL, ERXSTL, ESTAT, ETXSTL,
    EWRPTL, econ1, econ2, estat,
};
use crate::internal::register::mac::{
    MAADR, MABBIPG, MABBIPG_FULL_DUPLEX, MABBIPG_HALF_DUPLEX, MACLCON2, MACLCON2_COLLISION_WINDOW,
    MACON1, MACON3, MACON4, MAIPGH, MAIPGH_DEFAULT, MAIPGL, MAIPGL_DEFAULT, MAMXFLL, macon1,
    macon3, macon4,
};

// =============================================================================
// ENC28J60 Driver
// =============================================================================

/// ENC28J60 Ethernet controller driver
///
/// Owns the SPI device and tracks the driver-side state the controller
/// does not keep itself: the receive ring bounds, which packet (if any) is
/// staged for reading, and the silicon revision.
///
/// # Example
///
/// ```ignore
/// use ph_enc28j60::{Enc28j60, Enc28j60Config};
///
/// let mut eth = Enc28j60::new(spi_device);
/// eth.init(
///     Enc28j60Config::new().with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56]),
///     &mut delay,
/// )?;
///
/// let mut frame = [0u8; 1518];
/// if let Ok(len) = eth.receive(&mut frame) {
///     // process &frame[..len]
/// }
/// ```
#[derive(Debug)]
pub struct Enc28j60<SPI> {
    pub(super) bus: ControlBus<SPI>,
    pub(super) config: Enc28j60Config,
    state: State,
    revision: Revision,
    pub(super) ring: RxRing,
    pub(super) rx: RxState,
}

impl<SPI> Enc28j60<SPI> {
    /// Wrap an SPI device
    ///
    /// No bus traffic happens until [`Enc28j60::init`].
    pub const fn new(spi: SPI) -> Self {
        Self {
            bus: ControlBus::new(spi),
            config: Enc28j60Config::new(),
            state: State::Uninitialized,
            revision: Revision::Unknown(0),
            ring: RxRing::DEFAULT,
            rx: RxState::Idle {
                next: RxRing::DEFAULT.first(),
            },
        }
    }

    /// Current driver state
    #[inline(always)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Silicon revision read during [`Enc28j60::init`]
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Active configuration
    pub fn config(&self) -> &Enc28j60Config {
        &self.config
    }

    /// Station MAC address
    pub fn mac_address(&self) -> [u8; MAC_ADDR_LEN] {
        self.config.mac_address
    }

    /// Receive ring in use
    pub fn rx_ring(&self) -> RxRing {
        self.ring
    }

    /// Whether the receiver is running
    #[inline(always)]
    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Give the SPI device back
    pub fn release(self) -> SPI {
        self.bus.release()
    }

    #[inline(always)]
    pub(super) fn ensure_running(&self) -> Result<()> {
        if self.state == State::Running {
            Ok(())
        } else {
            Err(IoError::InvalidState.into())
        }
    }

    #[inline(always)]
    pub(super) fn ensure_initialized(&self) -> Result<()> {
        if self.state == State::Uninitialized {
            Err(IoError::InvalidState.into())
        } else {
            Ok(())
        }
    }
}

impl<SPI: SpiDevice> Enc28j60<SPI> {
    // =========================================================================
    // Initialization
    // =========================================================================

    /// Reset and configure the controller, then enable reception
    ///
    /// Sequence:
    /// 1. Leave power save, issue the system reset, wait for CLKRDY
    /// 2. Program the receive ring and transmit buffer (bank 0)
    /// 3. Program the receive filter (bank 1)
    /// 4. Program the MAC (bank 2)
    /// 5. Program the station address and clock output, read EREVID (bank 3)
    /// 6. Program the PHY
    /// 7. Set ECON1.RXEN
    ///
    /// On any failure the driver stays [`State::Uninitialized`] and `init`
    /// may be called again.
    pub fn init<D: DelayNs>(&mut self, config: Enc28j60Config, delay: D) -> Result<()> {
        if self.state != State::Uninitialized {
            return Err(ConfigError::AlreadyInitialized.into());
        }
        config.validate()?;
        let ring = config.memory.rx_ring()?;

        self.bus.set_poll_limit(config.poll_limit);
        ResetController::new(delay).reset(&mut self.bus)?;

        self.configure_buffers(&config, ring)?;
        self.bus.with_bank(Bank::Bank1, |bus| {
            bus.write(ERXFCON, config.receive_filter.to_erxfcon())
        })?;
        self.configure_mac(&config)?;
        let erevid = self.bus.with_bank(Bank::Bank3, |bus| {
            for (reg, byte) in MAADR.iter().zip(config.mac_address) {
                bus.write(*reg, byte)?;
            }
            bus.write(ECOCON, config.clock_out.to_reg_value())?;
            bus.read(EREVID)
        })?;
        self.configure_phy(&config)?;
        self.bus.set_bits(ECON1, econ1::RXEN)?;

        self.revision = Revision::from_erevid(erevid);
        self.ring = ring;
        self.rx = RxState::Idle { next: ring.first() };
        self.config = config;
        self.state = State::Running;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "ENC28J60 up: rev {}, rx ring {=u16:#x}..{=u16:#x}",
            self.revision,
            ring.start(),
            ring.stop()
        );

        Ok(())
    }

    fn configure_buffers(&mut self, config: &Enc28j60Config, ring: RxRing) -> Result<()> {
        let bus = &mut self.bus;
        bus.write_u16(ERXSTL, ring.start())?;
        // Nothing consumed yet: protect up to the byte before the ring start
        bus.write_u16(ERXRDPTL, ring.stop())?;
        bus.write_u16(ERXNDL, ring.stop())?;
        bus.write_u16(ETXSTL, config.memory.tx_start)?;
        bus.write_u16(EWRPTL, config.memory.tx_start)?;
        bus.write_buffer(&[TX_CONTROL_BYTE])
    }

    fn configure_mac(&mut self, config: &Enc28j60Config) -> Result<()> {
        let full = config.duplex == Duplex::Full;
        self.bus.with_bank(Bank::Bank2, |bus| {
            bus.write(MACON1, macon1::TXPAUS | macon1::RXPAUS | macon1::MARXEN)?;
            let mut mode = macon3::PADCFG0 | macon3::TXCRCEN | macon3::FRMLNEN;
            if full {
                mode |= macon3::FULDPX;
            }
            bus.write(MACON3, mode)?;
            bus.write(MABBIPG, back_to_back_gap(config.duplex))?;
            bus.write(MACON4, macon4::DEFER)?;
            bus.write(MACLCON2, MACLCON2_COLLISION_WINDOW)?;
            bus.write(MAIPGL, MAIPGL_DEFAULT)?;
            bus.write(MAIPGH, MAIPGH_DEFAULT)?;
            bus.write_u16(MAMXFLL, config.max_frame_len)
        })
    }

    fn configure_phy(&mut self, config: &Enc28j60Config) -> Result<()> {
        self.bus.write_phy(phy_reg::PHCON2, phcon2::HDLDIS)?;
        self.bus.write_phy(phy_reg::PHLCON, config.led_config)?;
        self.bus.write_phy(phy_reg::PHCON1, phy_duplex_bits(config.duplex))
    }

    // =========================================================================
    // Power Management
    // =========================================================================

    /// Stop reception and enter power save
    ///
    /// Waits for an in-flight receive and transmit to finish first. The
    /// receive ring contents survive; [`Enc28j60::power_up`] resumes where
    /// reception stopped.
    pub fn power_down(&mut self) -> Result<()> {
        self.ensure_running()?;
        let limit = self.bus.poll_limit();

        self.bus.clear_bits(ECON1, econ1::RXEN)?;
        if !self.bus.poll(ESTAT, limit, |v| v & estat::RXBUSY == 0)? {
            return Err(IoError::Timeout.into());
        }
        if !self.bus.poll(ECON1, limit, |v| v & econ1::TXRTS == 0)? {
            return Err(IoError::Timeout.into());
        }
        self.bus.set_bits(ECON2, econ2::PWRSV)?;
        self.state = State::PoweredDown;

        #[cfg(feature = "defmt")]
        defmt::debug!("ENC28J60 powered down");

        Ok(())
    }

    /// Leave power save and re-enable reception
    ///
    /// A no-op when already running.
    pub fn power_up(&mut self) -> Result<()> {
        match self.state {
            State::Running => return Ok(()),
            State::PoweredDown => {}
            State::Uninitialized => return Err(IoError::InvalidState.into()),
        }

        self.bus.clear_bits(ECON2, econ2::PWRSV)?;
        let limit = self.bus.poll_limit();
        if !self.bus.poll(ESTAT, limit, |v| v & estat::CLKRDY != 0)? {
            return Err(IoError::Timeout.into());
        }
        self.bus.set_bits(ECON1, econ1::RXEN)?;
        self.state = State::Running;

        #[cfg(feature = "defmt")]
        defmt::debug!("ENC28J60 powered up");

        Ok(())
    }

    // =========================================================================
    // Runtime Configuration
    // =========================================================================

    /// Change the station MAC address
    ///
    /// Multicast addresses are rejected with [`ConfigError::InvalidConfig`].
    pub fn set_mac_address(&mut self, addr: [u8; MAC_ADDR_LEN]) -> Result<()> {
        self.ensure_initialized()?;
        if addr[0] & 0x01 != 0 {
            return Err(ConfigError::InvalidConfig.into());
        }
        self.bus.with_bank(Bank::Bank3, |bus| {
            for (reg, byte) in MAADR.iter().zip(addr) {
                bus.write(*reg, byte)?;
            }
            Ok(())
        })?;
        self.config.mac_address = addr;
        Ok(())
    }

    /// Switch MAC and PHY to `duplex`
    ///
    /// The link partner has no way to learn about the change: the
    /// controller does not auto-negotiate.
    pub fn set_duplex(&mut self, duplex: Duplex) -> Result<()> {
        self.ensure_initialized()?;
        self.bus.with_bank(Bank::Bank2, |bus| {
            let mode = bus.read(MACON3)?;
            let mode = match duplex {
                Duplex::Full => mode | macon3::FULDPX,
                Duplex::Half => mode & !macon3::FULDPX,
            };
            bus.write(MACON3, mode)?;
            bus.write(MABBIPG, back_to_back_gap(duplex))
        })?;
        self.bus.write_phy(phy_reg::PHCON1, phy_duplex_bits(duplex))?;
        self.config.duplex = duplex;
        Ok(())
    }

    /// Configure the CLKOUT pin
    pub fn set_clock_out(&mut self, clock_out: ClockOut) -> Result<()> {
        self.ensure_initialized()?;
        self.bus
            .with_bank(Bank::Bank3, |bus| bus.write(ECOCON, clock_out.to_reg_value()))?;
        self.config.clock_out = clock_out;
        Ok(())
    }

    /// Read back the CLKOUT configuration
    pub fn clock_out(&mut self) -> Result<ClockOut> {
        self.ensure_initialized()?;
        let value = self.bus.with_bank(Bank::Bank3, |bus| bus.read(ECOCON))?;
        Ok(ClockOut::from_reg_value(value))
    }

    // =========================================================================
    // Link
    // =========================================================================

    /// Latched link state
    ///
    /// Returns `false` once after the link dropped, even if it has come back.
    pub fn is_linked(&mut self) -> Result<bool> {
        self.ensure_initialized()?;
        self.bus.is_linked()
    }

    /// Live link state and duplex
    pub fn link_status(&mut self) -> Result<LinkStatus> {
        self.ensure_initialized()?;
        self.bus.link_status()
    }

    // =========================================================================
    // Buffer Memory Access
    // =========================================================================

    /// Read one byte at the read pointer
    pub fn get(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.get_array(&mut byte)?;
        Ok(byte[0])
    }

    /// Fill `buf` from the read pointer, returning the number of bytes read
    ///
    /// The read pointer advances and wraps at the end of the receive ring.
    pub fn get_array(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_initialized()?;
        self.bus.read_buffer(buf)?;
        Ok(buf.len())
    }

    /// Write one byte at the write pointer
    pub fn put(&mut self, byte: u8) -> Result<()> {
        self.put_array(&[byte])
    }

    /// Write `data` at the write pointer
    pub fn put_array(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_initialized()?;
        self.bus.write_buffer(data)
    }

    /// Move the read pointer, returning the previous value
    pub fn set_read_pointer(&mut self, addr: u16) -> Result<u16> {
        let old = self.read_pointer()?;
        self.bus.write_u16(ERDPTL, addr)?;
        Ok(old)
    }

    /// Move the write pointer, returning the previous value
    pub fn set_write_pointer(&mut self, addr: u16) -> Result<u16> {
        let old = self.write_pointer()?;
        self.bus.write_u16(EWRPTL, addr)?;
        Ok(old)
    }

    /// Current read pointer (ERDPT)
    pub fn read_pointer(&mut self) -> Result<u16> {
        self.ensure_initialized()?;
        self.bus.read_u16(ERDPTL)
    }

    /// Current write pointer (EWRPT)
    pub fn write_pointer(&mut self) -> Result<u16> {
        self.ensure_initialized()?;
        self.bus.read_u16(EWRPTL)
    }
}

const fn back_to_back_gap(duplex: Duplex) -> u8 {
    match duplex {
        Duplex::Full => MABBIPG_FULL_DUPLEX,
        Duplex::Half => MABBIPG_HALF_DUPLEX,
    }
}

const fn phy_duplex_bits(duplex: Duplex) -> u16 {
    match duplex {
        Duplex::Full => phcon1::PDPXMD,
        Duplex::Half => 0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
