//! Critical-section cell backing [`SharedEnc28j60`](super::SharedEnc28j60).

use core::cell::RefCell;
use critical_section::Mutex;

/// `RefCell` guarded by a `critical_section::Mutex`
///
/// Every access runs inside `critical_section::with`, so thread mode and
/// interrupt handlers never observe each other mid-update. `Sync` whenever
/// `T: Send`, which lets it sit in a `static`.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Wrap `value`; usable in `static` initializers
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` on the contents inside a critical section
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from inside another `with` on the same
    /// cell.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }

    /// Like [`with`](Self::with), but `None` when the contents are already
    /// borrowed further up the stack
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .try_borrow_mut()
                .ok()
                .map(|mut value| f(&mut value))
        })
    }

    /// Swap in `value`, returning the old contents
    #[inline]
    pub fn replace(&self, value: T) -> T {
        critical_section::with(|cs| self.inner.replace(cs, value))
    }
}
