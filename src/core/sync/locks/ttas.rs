/*!
 * Test-and-Test-and-Set Family
 *
 * One lock word, one engine, a pluggable wait policy:
 * - [`LocalSpinLock`]: plain reads between swaps
 * - [`ConstantBackoffLock`]: fixed delay between reads (pause or busy loop)
 * - [`ExponentialBackoffLock`]: doubling delay, saturating
 * - [`RandomBackoffLock`]: uniformly redrawn delay, explicitly seeded
 *
 * # Design
 *
 * A failed swap drops into a read-only loop. Plain loads are served from the
 * waiter's own cached copy of the line and only miss once the holder's
 * release invalidates it, so waiters stop generating write traffic. The
 * backoff state is created on the slow path only, so an uncontended acquire
 * costs exactly one swap, and it restarts from the minimum on every acquire.
 */

use super::traits::RawLock;
use crate::core::sync::backoff::{
    Backoff, BackoffPolicy, ConstantBackoff, Delay, ExponentialPolicy, NoBackoff, RandomizedPolicy,
};
use crate::core::sync::config::BackoffConfig;
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicBool, Ordering};

/// Test-and-test-and-set spin-lock parameterized by its wait policy
#[derive(Debug, Default)]
pub struct TtasLock<P: BackoffPolicy = NoBackoff> {
    locked: CachePadded<AtomicBool>,
    policy: P,
}

/// Local spinning, no delay beyond a spin-wait hint
pub type LocalSpinLock = TtasLock<NoBackoff>;
/// Fixed delay per failed poll
pub type ConstantBackoffLock = TtasLock<ConstantBackoff>;
/// Doubling delay per failed poll
pub type ExponentialBackoffLock = TtasLock<ExponentialPolicy>;
/// Uniformly redrawn delay per failed poll
pub type RandomBackoffLock = TtasLock<RandomizedPolicy>;

impl<P: BackoffPolicy> TtasLock<P> {
    pub fn with_policy(policy: P) -> Self {
        Self {
            locked: CachePadded::new(AtomicBool::new(false)),
            policy,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[cold]
    fn acquire_contended(&self) {
        let mut backoff = self.policy.start();
        loop {
            while self.locked.load(Ordering::Relaxed) {
                backoff.snooze();
            }
            if !self.locked.swap(true, Ordering::Acquire) {
                return;
            }
        }
    }
}

impl TtasLock<NoBackoff> {
    pub const fn new() -> Self {
        Self {
            locked: CachePadded::new(AtomicBool::new(false)),
            policy: NoBackoff,
        }
    }
}

impl TtasLock<ConstantBackoff> {
    /// Pause-hint backoff with `config.constant_iters` units per poll
    pub fn new(config: &BackoffConfig) -> Self {
        Self::with_policy(ConstantBackoff::new(config.constant_iters, config.delay))
    }

    /// Busy-loop backoff with `iters` counting iterations per poll
    pub fn active(iters: u32) -> Self {
        Self::with_policy(ConstantBackoff::new(iters, Delay::Busy))
    }
}

impl TtasLock<ExponentialPolicy> {
    pub fn new(config: &BackoffConfig) -> Self {
        Self::with_policy(ExponentialPolicy::new(config))
    }
}

impl TtasLock<RandomizedPolicy> {
    /// Seeded from OS entropy, independently per instance
    pub fn new(config: &BackoffConfig) -> Self {
        Self::with_policy(RandomizedPolicy::new(config))
    }

    /// Reproducible backoff sequences
    pub fn with_seed(config: &BackoffConfig, seed: u64) -> Self {
        Self::with_policy(RandomizedPolicy::with_seed(config, seed))
    }
}

unsafe impl<P: BackoffPolicy> RawLock for TtasLock<P> {
    #[inline]
    fn acquire(&self) {
        if !self.locked.swap(true, Ordering::Acquire) {
            return;
        }
        self.acquire_contended();
    }

    #[inline]
    fn try_acquire(&self) -> bool {
        !self.locked.load(Ordering::Relaxed) && !self.locked.swap(true, Ordering::Acquire)
    }

    #[inline]
    unsafe fn release(&self) {
        self.locked.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        self.policy.name()
    }
}
