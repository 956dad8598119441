//! Single-in-flight guard for checkout batches.

use std::sync::atomic::{AtomicBool, Ordering};

/// Allows at most one holder at a time.
#[derive(Debug, Default)]
pub struct InFlightLatch {
    busy: AtomicBool,
}

impl InFlightLatch {
    /// Creates a released latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the latch, or returns `None` if it is already held.
    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { latch: self })
    }

    /// Returns true while a guard is alive.
    pub fn is_held(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the latch on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    latch: &'a InFlightLatch,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.latch.busy.store(false, Ordering::Release);
    }
}
