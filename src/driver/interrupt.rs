//! Interrupt flag handling for the ENC28J60.
//!
//! This module provides [`InterruptStatus`] for decoding EIR and the
//! driver methods that read, clear and enable the flags. The INT pin stays
//! disabled unless [`Enc28j60::enable_interrupts`] is called; polling the
//! flags works either way.

use embedded_hal::spi::SpiDevice;

use super::enc28j60::Enc28j60;
use super::error::Result;
use crate::internal::register::eth::{EIE, EIR, eie, eir};

// =============================================================================
// Interrupt Status
// =============================================================================

/// Interrupt flags parsed from EIR
///
/// Also used as the enable mask for [`Enc28j60::enable_interrupts`], since
/// EIE mirrors the EIR layout.
///
/// # Example
///
/// ```ignore
/// let status = eth.interrupt_status()?;
/// if status.packet_pending {
///     // Drain the receive ring
/// }
/// if status.has_error() {
///     eth.clear_interrupts(status)?;
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// At least one packet waits in the receive ring
    pub packet_pending: bool,
    /// DMA copy or checksum finished
    pub dma_done: bool,
    /// PHY link state changed
    pub link_changed: bool,
    /// Transmission finished
    pub tx_done: bool,
    /// Transmission aborted
    pub tx_error: bool,
    /// Receive buffer overflow or packet counter saturation
    pub rx_error: bool,
}

impl InterruptStatus {
    /// Every flag set
    pub const ALL: Self = Self {
        packet_pending: true,
        dma_done: true,
        link_changed: true,
        tx_done: true,
        tx_error: true,
        rx_error: true,
    };

    /// Decode an EIR value
    #[inline]
    pub const fn from_raw(value: u8) -> Self {
        Self {
            packet_pending: value & eir::PKTIF != 0,
            dma_done: value & eir::DMAIF != 0,
            link_changed: value & eir::LINKIF != 0,
            tx_done: value & eir::TXIF != 0,
            tx_error: value & eir::TXERIF != 0,
            rx_error: value & eir::RXERIF != 0,
        }
    }

    /// Encode as an EIR (or EIE) value
    #[inline]
    pub const fn to_raw(&self) -> u8 {
        let mut value = 0;
        if self.packet_pending {
            value |= eir::PKTIF;
        }
        if self.dma_done {
            value |= eir::DMAIF;
        }
        if self.link_changed {
            value |= eir::LINKIF;
        }
        if self.tx_done {
            value |= eir::TXIF;
        }
        if self.tx_error {
            value |= eir::TXERIF;
        }
        if self.rx_error {
            value |= eir::RXERIF;
        }
        value
    }

    /// Check if any flag is set
    #[inline]
    pub const fn any(&self) -> bool {
        self.to_raw() != 0
    }

    /// Check if a transmit or receive error is flagged
    #[inline]
    pub const fn has_error(&self) -> bool {
        self.tx_error || self.rx_error
    }
}

// =============================================================================
// Driver Methods
// =============================================================================

impl<SPI: SpiDevice> Enc28j60<SPI> {
    /// Read EIR
    ///
    /// PKTIF follows EPKTCNT and cannot be cleared directly; it drops once
    /// every packet has been discarded.
    pub fn interrupt_status(&mut self) -> Result<InterruptStatus> {
        self.ensure_initialized()?;
        Ok(InterruptStatus::from_raw(self.bus.read(EIR)?))
    }

    /// Clear the flags set in `status`
    pub fn clear_interrupts(&mut self, status: InterruptStatus) -> Result<()> {
        self.ensure_initialized()?;
        let mask = status.to_raw() & !eir::PKTIF;
        if mask != 0 {
            self.bus.clear_bits(EIR, mask)?;
        }
        Ok(())
    }

    /// Drive the INT pin for the flags set in `mask`
    ///
    /// Replaces the previous enable mask. An empty mask also clears the
    /// global INTIE bit.
    pub fn enable_interrupts(&mut self, mask: InterruptStatus) -> Result<()> {
        self.ensure_initialized()?;
        let bits = mask.to_raw();
        let value = if bits == 0 { 0 } else { bits | eie::INTIE };
        self.bus.write(EIE, value)
    }

    /// Stop driving the INT pin
    pub fn disable_interrupts(&mut self) -> Result<()> {
        self.enable_interrupts(InterruptStatus::default())
    }

    /// Currently enabled interrupt sources
    pub fn enabled_interrupts(&mut self) -> Result<InterruptStatus> {
        self.ensure_initialized()?;
        Ok(InterruptStatus::from_raw(self.bus.read(EIE)? & !eie::INTIE))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
