//! Receive ring manager
//!
//! The controller writes incoming packets into the receive ring, each one
//! prefixed by a 6-byte header holding the address of the next packet and a
//! receive status vector. The driver walks the ring with a two-step
//! protocol:
//!
//! 1. [`Enc28j60::try_get_header`] reads the header of the oldest packet and
//!    checks it out
//! 2. the caller reads whatever it needs from the packet
//! 3. [`Enc28j60::discard`] hands the packet's space back to the hardware
//!    by moving ERXRDPT and decrementing the packet counter
//!
//! Only one packet may be checked out at a time. Fetching another header
//! while one is outstanding discards the outstanding packet and reports
//! [`IoError::PacketOutstanding`]; the caller retries immediately.

use embedded_hal::spi::SpiDevice;

use super::enc28j60::Enc28j60;
use super::error::{Error, IoError, Result};
use super::frame::RxHeader;
use super::ring::RingOffset;
use crate::hal::Bank;
use crate::internal::constants::{PREAMBLE_SIZE, RX_STATUS_SIZE};
use crate::internal::register::eth::{ECON2, EPKTCNT, ERDPTL, ERXRDPTL, ERXWRPTL, econ2};

/// Read-side position in the receive ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum RxState {
    /// No packet checked out; `next` is where the oldest unread packet starts
    Idle { next: RingOffset },
    /// The packet at `current` is checked out; `next` follows it
    PacketStaged {
        current: RingOffset,
        next: RingOffset,
    },
}

impl<SPI: SpiDevice> Enc28j60<SPI> {
    /// Packets waiting in the ring (EPKTCNT)
    pub fn packet_count(&mut self) -> Result<u8> {
        self.ensure_initialized()?;
        self.bus.with_bank(Bank::Bank1, |bus| bus.read(EPKTCNT))
    }

    /// Whether a packet is checked out and not yet discarded
    pub fn has_packet_staged(&self) -> bool {
        matches!(self.rx, RxState::PacketStaged { .. })
    }

    /// Check out the oldest received packet and return its header
    ///
    /// Leaves the read pointer just past the Ethernet header, at the first
    /// payload byte.
    ///
    /// # Errors
    ///
    /// - [`IoError::PacketOutstanding`] if the previous packet was not
    ///   discarded. It has been discarded now; call again.
    /// - [`IoError::NoData`] if the ring is empty.
    /// - [`IoError::CorruptPreamble`] if the hardware header is not
    ///   plausible. Nothing is checked out; the ring is no longer
    ///   trustworthy and the controller needs to be reinitialized.
    pub fn try_get_header(&mut self) -> Result<RxHeader> {
        self.ensure_running()?;
        let next = match self.rx {
            RxState::Idle { next } => next,
            RxState::PacketStaged { .. } => {
                #[cfg(feature = "defmt")]
                defmt::debug!("header fetched with a packet outstanding, discarding it");
                self.discard()?;
                return Err(IoError::PacketOutstanding.into());
            }
        };

        if self.packet_count()? == 0 {
            return Err(IoError::NoData.into());
        }

        self.bus.write_u16(ERDPTL, next.addr())?;
        let mut preamble = [0u8; PREAMBLE_SIZE];
        self.bus.read_buffer(&mut preamble)?;
        let header = RxHeader::parse(&preamble);

        let Some(following) = self.check_header(&header) else {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "corrupt receive header at {=u16:#x}: next {=u16:#x}, status {=u32:#x}",
                next.addr(),
                header.next_packet,
                header.status.raw()
            );
            return Err(IoError::CorruptPreamble.into());
        };

        self.rx = RxState::PacketStaged {
            current: next,
            next: following,
        };
        Ok(header)
    }

    /// Validate a header and resolve its next-packet pointer
    fn check_header(&self, header: &RxHeader) -> Option<RingOffset> {
        if header.next_packet % 2 != 0
            || !header.status.zero_bit_clear()
            || header.status.byte_count() > self.config.max_frame_len
        {
            return None;
        }
        self.ring.offset(header.next_packet)
    }

    /// Release the checked-out packet to the hardware
    ///
    /// A no-op when nothing is checked out, so calling it twice is safe.
    /// ERXRDPT is set one byte before the next packet (it must stay odd),
    /// low byte first: the hardware latches the pair on the high byte.
    pub fn discard(&mut self) -> Result<()> {
        let RxState::PacketStaged { next, .. } = self.rx else {
            return Ok(());
        };
        self.bus.set_bits(ECON2, econ2::PKTDEC)?;
        self.bus.write_u16(ERXRDPTL, next.sub(1).addr())?;
        self.rx = RxState::Idle { next };
        Ok(())
    }

    /// Free bytes in the receive ring
    ///
    /// Reads the packet counter and hardware write pointer until the counter
    /// is stable across the read, so a packet arriving in between cannot
    /// pair an old count with a new pointer.
    pub fn free_space(&mut self) -> Result<u16> {
        self.ensure_initialized()?;
        let limit = self.bus.poll_limit();
        let write = self.bus.with_bank(Bank::Bank1, |bus| {
            for _ in 0..limit {
                let before = bus.read(EPKTCNT)?;
                bus.select_bank(Bank::Bank0)?;
                let write = bus.read_u16(ERXWRPTL)?;
                bus.select_bank(Bank::Bank1)?;
                if bus.read(EPKTCNT)? == before {
                    return Ok(Some(write));
                }
            }
            Ok(None)
        })?;
        let write = write.ok_or(Error::Io(IoError::Timeout))?;
        let read = self.bus.read_u16(ERXRDPTL)?;
        Ok(self.ring.free_space(write, read))
    }

    /// Move the read pointer to `offset` bytes past the checked-out
    /// packet's Ethernet header
    pub fn set_read_offset(&mut self, offset: u16) -> Result<()> {
        let current = self.staged_packet()?;
        let addr = current.add(PREAMBLE_SIZE as u16).add(offset).addr();
        self.bus.write_u16(ERDPTL, addr)
    }

    /// Start of the checked-out packet
    pub(super) fn staged_packet(&self) -> Result<RingOffset> {
        match self.rx {
            RxState::PacketStaged { current, .. } => Ok(current),
            RxState::Idle { .. } => Err(IoError::InvalidState.into()),
        }
    }

    /// Receive one frame into `buf`
    ///
    /// Copies the whole frame (Ethernet header included, CRC excluded) and
    /// discards the packet. Returns the frame length.
    ///
    /// A packet left checked out by an earlier [`Enc28j60::try_get_header`]
    /// is discarded first. If `buf` is too short the packet is dropped and
    /// [`IoError::BufferTooSmall`] returned.
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        let header = match self.try_get_header() {
            Err(Error::Io(IoError::PacketOutstanding)) => self.try_get_header()?,
            other => other?,
        };

        let len = header.frame_len();
        let Some(frame) = buf.get_mut(..len) else {
            self.discard()?;
            return Err(IoError::BufferTooSmall.into());
        };

        let current = self.staged_packet()?;
        self.bus
            .write_u16(ERDPTL, current.add(RX_STATUS_SIZE as u16).addr())?;
        self.bus.read_buffer(frame)?;
        self.discard()?;
        Ok(len)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
