/*!
 * Naive Spin-Lock
 *
 * Test-and-set in a tight loop. The atomic swap is the sole arbiter: exactly
 * one concurrent swap observes "previously free".
 *
 * Every failed attempt is still a write, so each waiter keeps pulling the
 * cache line into exclusive state. Under N waiters that is O(N²) coherence
 * traffic, which the test-and-test-and-set family exists to avoid.
 */

use super::traits::RawLock;
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicBool, Ordering};

/// Test-and-set spin-lock
#[derive(Debug, Default)]
pub struct NaiveSpinLock {
    locked: CachePadded<AtomicBool>,
}

impl NaiveSpinLock {
    pub const fn new() -> Self {
        Self {
            locked: CachePadded::new(AtomicBool::new(false)),
        }
    }
}

unsafe impl RawLock for NaiveSpinLock {
    #[inline]
    fn acquire(&self) {
        // Deliberately no read-only phase and no pause hint
        while self.locked.swap(true, Ordering::Acquire) {}
    }

    #[inline]
    fn try_acquire(&self) -> bool {
        !self.locked.swap(true, Ordering::Acquire)
    }

    #[inline]
    unsafe fn release(&self) {
        self.locked.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "naive"
    }
}
