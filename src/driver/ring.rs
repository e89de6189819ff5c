//! Receive ring arithmetic
//!
//! The receive buffer is the address range `start..=stop` and wraps from
//! `stop` back to `start`. [`RingOffset`] is an address known to be inside
//! a ring, so moving it forwards or backwards always yields a valid ring
//! address.

use crate::internal::constants::{BUFFER_SIZE, DEFAULT_RX_START, DEFAULT_RX_STOP};

// =============================================================================
// Receive Ring
// =============================================================================

/// Receive ring bounds (`stop` inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxRing {
    start: u16,
    stop: u16,
}

impl RxRing {
    /// Ring of the default memory layout
    pub const DEFAULT: Self = Self {
        start: DEFAULT_RX_START,
        stop: DEFAULT_RX_STOP,
    };

    /// Ring spanning `start..=stop`
    ///
    /// Returns `None` unless `start < stop` and `stop` lies inside the
    /// buffer. A ring wrapping across the end of the address space is not
    /// representable.
    pub const fn new(start: u16, stop: u16) -> Option<Self> {
        if start < stop && (stop as usize) < BUFFER_SIZE {
            Some(Self { start, stop })
        } else {
            None
        }
    }

    /// First address
    #[inline(always)]
    pub const fn start(self) -> u16 {
        self.start
    }

    /// Last address (inclusive)
    #[inline(always)]
    pub const fn stop(self) -> u16 {
        self.stop
    }

    /// Number of bytes in the ring
    #[inline(always)]
    pub const fn size(self) -> u16 {
        self.stop - self.start + 1
    }

    /// Whether `addr` is inside the ring
    #[inline(always)]
    pub const fn contains(self, addr: u16) -> bool {
        addr >= self.start && addr <= self.stop
    }

    /// The first address as a ring position
    pub const fn first(self) -> RingOffset {
        RingOffset {
            ring: self,
            addr: self.start,
        }
    }

    /// `addr` as a ring position, if it is inside the ring
    pub const fn offset(self, addr: u16) -> Option<RingOffset> {
        if self.contains(addr) {
            Some(RingOffset { ring: self, addr })
        } else {
            None
        }
    }

    /// Bring an address computed past `stop` back into the ring
    ///
    /// Addresses at or below `stop` are returned unchanged.
    pub const fn wrap(self, addr: u32) -> u16 {
        if addr > self.stop as u32 {
            (addr - self.size() as u32) as u16
        } else {
            addr as u16
        }
    }

    /// Free bytes between the hardware write pointer and the read pointer
    ///
    /// `write == read` is reported as an empty ring.
    pub const fn free_space(self, write: u16, read: u16) -> u16 {
        if write > read {
            (self.stop - self.start) - (write - read)
        } else if write == read {
            self.size() - 1
        } else {
            read - write - 1
        }
    }
}

// =============================================================================
// Ring Offset
// =============================================================================

/// An address inside a [`RxRing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingOffset {
    ring: RxRing,
    addr: u16,
}

impl RingOffset {
    /// Buffer address
    #[inline(always)]
    pub const fn addr(self) -> u16 {
        self.addr
    }

    /// The ring this offset belongs to
    pub const fn ring(self) -> RxRing {
        self.ring
    }

    /// Move forward by `delta` bytes, wrapping at the end of the ring
    #[must_use]
    pub const fn add(self, delta: u16) -> Self {
        let size = self.ring.size() as u32;
        let pos = (self.addr - self.ring.start) as u32;
        let addr = self.ring.start + ((pos + delta as u32 % size) % size) as u16;
        Self { ring: self.ring, addr }
    }

    /// Move backward by `delta` bytes, wrapping at the start of the ring
    #[must_use]
    pub const fn sub(self, delta: u16) -> Self {
        let size = self.ring.size() as u32;
        let pos = (self.addr - self.ring.start) as u32;
        let addr = self.ring.start + ((pos + size - delta as u32 % size) % size) as u16;
        Self { ring: self.ring, addr }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
