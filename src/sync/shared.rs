//! ISR-safe driver wrapper using critical sections.
//!
//! Provides [`SharedEnc28j60`], a static holder for a driver handle that is
//! used from both thread mode and an interrupt handler.

use super::primitives::CriticalSectionCell;
use crate::driver::enc28j60::Enc28j60;

/// ISR-safe ENC28J60 holder using critical sections.
///
/// Every driver operation owns the whole chip for its duration (the
/// transmit errata path moves the read pointer the receive path also uses),
/// so the entire handle lives behind one lock. All access goes through
/// `critical_section::with()`, disabling interrupts for the duration of the
/// closure.
///
/// The holder starts empty; the driver is moved in with [`install`] once
/// the SPI device exists.
///
/// # Example
///
/// ```ignore
/// static ETH: SharedEnc28j60<MySpiDevice> = SharedEnc28j60::new();
///
/// let mut eth = Enc28j60::new(spi);
/// eth.init(Enc28j60Config::new(), &mut delay)?;
/// ETH.install(eth);
///
/// #[interrupt]
/// fn EXTI0() {
///     ETH.with(|eth| {
///         let status = eth.interrupt_status()?;
///         eth.clear_interrupts(status)
///     });
/// }
/// ```
///
/// [`install`]: SharedEnc28j60::install
pub struct SharedEnc28j60<SPI> {
    inner: CriticalSectionCell<Option<Enc28j60<SPI>>>,
}

impl<SPI> SharedEnc28j60<SPI> {
    /// Create an empty holder (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }

    /// Move a driver in, returning the one previously installed.
    pub fn install(&self, driver: Enc28j60<SPI>) -> Option<Enc28j60<SPI>> {
        self.inner.replace(Some(driver))
    }

    /// Move the driver out, leaving the holder empty.
    pub fn take(&self) -> Option<Enc28j60<SPI>> {
        self.inner.replace(None)
    }

    /// Whether a driver is installed
    pub fn is_installed(&self) -> bool {
        self.inner.with(|slot| slot.is_some())
    }

    /// Execute a closure with exclusive access to the driver.
    ///
    /// Returns `None` when no driver is installed. Interrupts are disabled
    /// for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Enc28j60<SPI>) -> R,
    {
        self.inner.with(|slot| slot.as_mut().map(f))
    }

    /// Like [`with`](Self::with), but also returns `None` instead of
    /// panicking when the driver is already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Enc28j60<SPI>) -> R,
    {
        self.inner.try_with(|slot| slot.as_mut().map(f)).flatten()
    }
}

impl<SPI> Default for SharedEnc28j60<SPI> {
    fn default() -> Self {
        Self::new()
    }
}
