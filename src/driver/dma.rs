//! Checksum and in-device copy engine
//!
//! The controller's DMA block copies buffer memory to buffer memory and
//! computes Internet checksums without moving data over SPI. Checksums can
//! also be computed in software by streaming the buffer through a
//! [`ChecksumAccumulator`]; [`ChecksumMode`] selects the engine.
//!
//! Source ranges starting inside the receive ring wrap at its end, matching
//! how the hardware walks the ring.

use embedded_hal::spi::SpiDevice;

use super::checksum::ChecksumAccumulator;
use super::config::ChecksumMode;
use super::enc28j60::Enc28j60;
use super::error::{IoError, Result};
use crate::internal::constants::{BUFFER_END, CHECKSUM_CHUNK, PREAMBLE_SIZE};
use crate::internal::register::eth::{
    ECON1, EDMACSL, EDMADSTL, EDMANDL, EDMASTL, ERDPTL, EWRPTL, econ1,
};

/// Address argument for [`Enc28j60::copy_async`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferPointer {
    /// The current read pointer (source) or write pointer (destination),
    /// advanced past the copied bytes
    Current,
    /// A fixed buffer address; no pointer is moved
    At(u16),
}

impl<SPI: SpiDevice> Enc28j60<SPI> {
    /// `addr + delta`, wrapping inside the receive ring when `addr` is in it
    fn advance(&self, addr: u16, delta: u16) -> u16 {
        let sum = addr as u32 + delta as u32;
        if self.ring.contains(addr) {
            self.ring.wrap(sum)
        } else {
            (sum as u16) & BUFFER_END
        }
    }

    fn wait_dma_idle(&mut self) -> Result<()> {
        let limit = self.bus.poll_limit();
        if self.bus.poll(ECON1, limit, |v| v & econ1::DMAST == 0)? {
            Ok(())
        } else {
            Err(IoError::Timeout.into())
        }
    }

    // =========================================================================
    // Copy
    // =========================================================================

    /// Copy `len` bytes of buffer memory from `source` to `dest`
    ///
    /// Copies of two or more bytes run on the DMA engine and return once
    /// started; poll [`Enc28j60::is_copy_done`] before relying on the
    /// destination. A copy still in flight is waited for first. Zero and
    /// one byte copies are done over SPI and complete immediately.
    ///
    /// [`BufferPointer::Current`] pointers end up `len` bytes further on;
    /// [`BufferPointer::At`] leaves the corresponding pointer untouched.
    pub fn copy_async(&mut self, dest: BufferPointer, source: BufferPointer, len: u16) -> Result<()> {
        self.ensure_initialized()?;
        if len <= 1 {
            return self.copy_bytewise(dest, source, len);
        }
        self.wait_dma_idle()?;

        let src = match source {
            BufferPointer::Current => self.bus.read_u16(ERDPTL)?,
            BufferPointer::At(addr) => addr,
        };
        let dst = match dest {
            BufferPointer::Current => {
                let addr = self.bus.read_u16(EWRPTL)?;
                let advanced = self.advance(addr, len);
                self.bus.write_u16(EWRPTL, advanced)?;
                addr
            }
            BufferPointer::At(addr) => addr,
        };
        let end = self.advance(src, len - 1);

        self.bus.write_u16(EDMASTL, src)?;
        self.bus.write_u16(EDMANDL, end)?;
        self.bus.write_u16(EDMADSTL, dst)?;
        self.bus.clear_bits(ECON1, econ1::CSUMEN)?;
        self.bus.set_bits(ECON1, econ1::DMAST)?;

        if source == BufferPointer::Current {
            let after = self.advance(end, 1);
            self.bus.write_u16(ERDPTL, after)?;
        }
        Ok(())
    }

    /// Copy through the host for lengths the DMA engine cannot express
    fn copy_bytewise(&mut self, dest: BufferPointer, source: BufferPointer, len: u16) -> Result<()> {
        let saved_read = self.bus.read_u16(ERDPTL)?;
        let saved_write = self.bus.read_u16(EWRPTL)?;
        if let BufferPointer::At(addr) = source {
            self.bus.write_u16(ERDPTL, addr)?;
        }
        if let BufferPointer::At(addr) = dest {
            self.bus.write_u16(EWRPTL, addr)?;
        }

        if len == 1 {
            let mut byte = [0u8; 1];
            self.bus.read_buffer(&mut byte)?;
            self.bus.write_buffer(&byte)?;
        }

        if matches!(source, BufferPointer::At(_)) {
            self.bus.write_u16(ERDPTL, saved_read)?;
        }
        if matches!(dest, BufferPointer::At(_)) {
            self.bus.write_u16(EWRPTL, saved_write)?;
        }
        Ok(())
    }

    /// Whether the last DMA copy has finished (ECON1.DMAST clear)
    pub fn is_copy_done(&mut self) -> Result<bool> {
        self.ensure_initialized()?;
        Ok(self.bus.read(ECON1)? & econ1::DMAST == 0)
    }

    // =========================================================================
    // Checksum
    // =========================================================================

    /// Internet checksum of `len` bytes starting at the read pointer
    ///
    /// The read pointer is left unchanged, including on error.
    pub fn buffer_checksum(&mut self, len: u16) -> Result<u16> {
        self.ensure_initialized()?;
        let saved = self.bus.read_u16(ERDPTL)?;
        let checksum = match self.config.checksum_mode {
            ChecksumMode::Software => self.software_checksum(len),
            ChecksumMode::Dma => self.dma_checksum(saved, len),
        };
        let restored = self.bus.write_u16(ERDPTL, saved);
        checksum.and_then(|sum| restored.map(|()| sum))
    }

    fn software_checksum(&mut self, len: u16) -> Result<u16> {
        let mut acc = ChecksumAccumulator::new();
        let mut chunk = [0u8; CHECKSUM_CHUNK];
        let mut remaining = len as usize;
        while remaining > 0 {
            let n = remaining.min(CHECKSUM_CHUNK);
            self.bus.read_buffer(&mut chunk[..n])?;
            acc.update(&chunk[..n]);
            remaining -= n;
        }
        Ok(acc.finish())
    }

    fn dma_checksum(&mut self, start: u16, len: u16) -> Result<u16> {
        if len == 0 {
            return Ok(ChecksumAccumulator::new().finish());
        }
        self.wait_dma_idle()?;

        let end = self.advance(start, len - 1);
        self.bus.write_u16(EDMASTL, start)?;
        self.bus.write_u16(EDMANDL, end)?;
        self.bus.set_bits(ECON1, econ1::CSUMEN)?;
        self.bus.set_bits(ECON1, econ1::DMAST)?;

        let limit = self.bus.poll_limit();
        let done = self.bus.poll(ECON1, limit, |v| v & econ1::DMAST == 0)?;
        if !done {
            self.bus.clear_bits(ECON1, econ1::CSUMEN)?;
            return Err(IoError::Timeout.into());
        }
        let checksum = self.bus.read_u16(EDMACSL)?;
        self.bus.clear_bits(ECON1, econ1::CSUMEN)?;
        Ok(checksum)
    }

    /// Internet checksum over `len` bytes of the checked-out packet,
    /// starting `offset` bytes past its Ethernet header
    ///
    /// The read pointer is left unchanged.
    pub fn checksum_over(&mut self, offset: u16, len: u16) -> Result<u16> {
        let current = self.staged_packet()?;
        let saved = self.bus.read_u16(ERDPTL)?;
        let start = current.add(PREAMBLE_SIZE as u16).add(offset).addr();

        let checksum = match self.bus.write_u16(ERDPTL, start) {
            Ok(()) => self.buffer_checksum(len),
            Err(e) => Err(e),
        };
        let restored = self.bus.write_u16(ERDPTL, saved);
        checksum.and_then(|sum| restored.map(|()| sum))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
