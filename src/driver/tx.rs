//! Transmit engine
//!
//! A frame is staged in the transmit buffer behind the per-packet control
//! byte, ETXND is pointed at its last byte and ECON1.TXRTS starts the
//! transmission. Two ways to stage:
//!
//! - [`Enc28j60::write_header`] writes the Ethernet header, the caller
//!   streams the payload with [`Enc28j60::put_array`], then calls
//!   [`Enc28j60::flush`]
//! - [`Enc28j60::transmit`] stages a complete frame and flushes
//!
//! # Late collision errata
//!
//! Rev. B5 and B7 silicon can report a late collision for a frame that was
//! never on the wire in half duplex, leaving the transmitter stuck. On those
//! revisions `flush` waits for the outcome and, while the status vector
//! reports a late collision, resends the already staged frame up to 16
//! times. The status vector is read through ERDPT, which is restored
//! afterwards.

use embedded_hal::spi::SpiDevice;

use super::enc28j60::Enc28j60;
use super::error::{IoError, Result};
use super::frame::{ETHER_TYPE_HIGH, EtherType, TxStatus};
use crate::internal::constants::{
    BUFFER_END, CRC_SIZE, ERRATA_POLL_LIMIT, ERRATA_RETRY_LIMIT, ETH_HEADER_SIZE, MAC_ADDR_LEN,
    MTU, TX_STATUS_SIZE,
};
use crate::internal::register::eth::{ECON1, EIR, ERDPTL, ETXNDL, EWRPTL, econ1, eir};

impl<SPI: SpiDevice> Enc28j60<SPI> {
    /// Whether a new frame may be staged (ECON1.TXRTS clear)
    pub fn is_tx_ready(&mut self) -> Result<bool> {
        self.ensure_initialized()?;
        Ok(self.bus.read(ECON1)? & econ1::TXRTS == 0)
    }

    fn ensure_tx_idle(&mut self) -> Result<()> {
        if self.is_tx_ready()? {
            Ok(())
        } else {
            Err(IoError::Busy.into())
        }
    }

    /// Stage an Ethernet header for a `payload_len` byte payload
    ///
    /// Sets ETXND for the whole frame and leaves the write pointer at the
    /// first payload byte. The source address is the station address.
    pub fn write_header(
        &mut self,
        dest: [u8; MAC_ADDR_LEN],
        ether_type: EtherType,
        payload_len: usize,
    ) -> Result<()> {
        self.ensure_running()?;
        let Some(type_low) = ether_type.low_byte() else {
            return Err(IoError::UnsupportedEtherType.into());
        };
        if payload_len > MTU {
            return Err(IoError::FrameTooLarge.into());
        }
        let frame_len = ETH_HEADER_SIZE + payload_len;
        if frame_len + CRC_SIZE > self.config.max_frame_len as usize {
            return Err(IoError::FrameTooLarge.into());
        }
        self.ensure_tx_idle()?;

        let tx_start = self.config.memory.tx_start;
        self.bus.write_u16(EWRPTL, tx_start + 1)?;
        self.bus.write_u16(ETXNDL, tx_start + frame_len as u16)?;

        let mut header = [0u8; ETH_HEADER_SIZE];
        header[..6].copy_from_slice(&dest);
        header[6..12].copy_from_slice(&self.config.mac_address);
        header[12] = ETHER_TYPE_HIGH;
        header[13] = type_low;
        self.bus.write_buffer(&header)
    }

    /// Stage a complete Ethernet frame (header included, CRC excluded) and
    /// send it
    ///
    /// Returns the number of bytes staged.
    pub fn transmit(&mut self, frame: &[u8]) -> Result<usize> {
        self.ensure_running()?;
        if frame.len() < ETH_HEADER_SIZE {
            return Err(IoError::BufferTooSmall.into());
        }
        if frame.len() + CRC_SIZE > self.config.max_frame_len as usize {
            return Err(IoError::FrameTooLarge.into());
        }
        self.ensure_tx_idle()?;

        let tx_start = self.config.memory.tx_start;
        self.bus.write_u16(EWRPTL, tx_start + 1)?;
        self.bus.write_buffer(frame)?;
        self.bus.write_u16(ETXNDL, tx_start + frame.len() as u16)?;
        self.flush()?;
        Ok(frame.len())
    }

    /// Send the staged frame
    ///
    /// On silicon without the late collision errata this returns as soon as
    /// the transmission is requested; poll [`Enc28j60::is_tx_ready`] for
    /// completion. On affected silicon it returns once the frame is out.
    ///
    /// # Errors
    ///
    /// Affected silicon only:
    /// - [`IoError::RetryExhausted`] after 16 retransmissions that all hit
    ///   a late collision
    /// - [`IoError::TxAborted`] for any other transmit error
    /// - [`IoError::Timeout`] if the transmitter reports neither success
    ///   nor failure
    pub fn flush(&mut self) -> Result<()> {
        self.ensure_running()?;
        self.request_transmission()?;
        if !self.revision().needs_tx_errata_workaround() {
            return Ok(());
        }

        if let Some(flags) = self.wait_tx_flags(ERRATA_POLL_LIMIT)? {
            if flags & eir::TXERIF == 0 {
                return Ok(());
            }
        }

        self.bus.clear_bits(ECON1, econ1::TXRTS)?;
        let saved = self.bus.read_u16(ERDPTL)?;
        let result = self.retransmit_late_collisions();
        let restored = self.bus.write_u16(ERDPTL, saved);
        result.and(restored)
    }

    /// Reset the transmit logic, clear the TX flags and set TXRTS
    fn request_transmission(&mut self) -> Result<()> {
        self.bus.set_bits(ECON1, econ1::TXRST)?;
        self.bus.clear_bits(ECON1, econ1::TXRST)?;
        self.bus.clear_bits(EIR, eir::TXERIF | eir::TXIF)?;
        self.bus.set_bits(ECON1, econ1::TXRTS)
    }

    /// Poll EIR for TXIF or TXERIF, returning the flags once either is set
    fn wait_tx_flags(&mut self, limit: u32) -> Result<Option<u8>> {
        let mut flags = 0;
        let done = self.bus.poll(EIR, limit, |value| {
            flags = value;
            value & (eir::TXERIF | eir::TXIF) != 0
        })?;
        Ok(done.then_some(flags))
    }

    /// Errata recovery loop; TXRTS is clear and ERDPT saved by the caller
    fn retransmit_late_collisions(&mut self) -> Result<()> {
        let mut status = self.load_tx_status()?;
        let mut retries = 0;

        let flags = loop {
            let flags = self.bus.read(EIR)?;
            if flags & eir::TXERIF == 0 || !status.late_collision() {
                break flags;
            }
            if retries == ERRATA_RETRY_LIMIT {
                #[cfg(feature = "defmt")]
                defmt::warn!("late collision persists after {} retransmissions", retries);
                return Err(IoError::RetryExhausted.into());
            }
            retries += 1;

            #[cfg(feature = "defmt")]
            defmt::debug!("late collision, retransmission {}", retries);

            self.request_transmission()?;
            let limit = self.bus.poll_limit();
            let finished = self.wait_tx_flags(limit)?;
            self.bus.clear_bits(ECON1, econ1::TXRTS)?;
            if finished.is_none() {
                return Err(IoError::Timeout.into());
            }
            status = self.load_tx_status()?;
        };

        if flags & eir::TXERIF != 0 {
            Err(IoError::TxAborted.into())
        } else if flags & eir::TXIF != 0 {
            Ok(())
        } else {
            Err(IoError::Timeout.into())
        }
    }

    /// Read the status vector the controller wrote past ETXND
    ///
    /// Moves ERDPT.
    fn load_tx_status(&mut self) -> Result<TxStatus> {
        let end = self.bus.read_u16(ETXNDL)?;
        self.bus.write_u16(ERDPTL, end.wrapping_add(1) & BUFFER_END)?;
        let mut bytes = [0u8; TX_STATUS_SIZE];
        self.bus.read_buffer(&mut bytes)?;
        Ok(TxStatus::from_bytes(bytes))
    }

    /// Transmit status vector of the last transmission
    ///
    /// The read pointer is left unchanged.
    pub fn read_tx_status(&mut self) -> Result<TxStatus> {
        self.ensure_initialized()?;
        let saved = self.bus.read_u16(ERDPTL)?;
        let status = self.load_tx_status();
        let restored = self.bus.write_u16(ERDPTL, saved);
        let status = status?;
        restored?;
        Ok(status)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
