/*!
 * Spin-Lock Strategies
 *
 * Mutual-exclusion primitives that differ only in how a blocked thread waits:
 * - Naive test-and-set
 * - Test-and-test-and-set with none, constant, exponential, or randomized backoff
 * - FIFO ticket lock
 * - Platform baselines behind the same capability
 */

mod baseline;
mod guard;
mod naive;
mod ticket;
mod traits;
mod ttas;

// Re-export public API
pub use baseline::PlatformMutex;
#[cfg(target_os = "linux")]
pub use baseline::PthreadSpinLock;
pub use guard::{LockGuard, Locked};
pub use naive::NaiveSpinLock;
pub use ticket::TicketLock;
pub use traits::RawLock;
pub use ttas::{
    ConstantBackoffLock, ExponentialBackoffLock, LocalSpinLock, RandomBackoffLock, TtasLock,
};

use super::config::{LockConfig, LockKind};
use crate::core::errors::HarnessResult;

impl LockKind {
    /// Construct a fresh, free instance of this strategy
    pub fn build(&self, config: &LockConfig) -> HarnessResult<Box<dyn RawLock>> {
        let backoff = &config.backoff;
        let lock: Box<dyn RawLock> = match self {
            LockKind::Naive => Box::new(NaiveSpinLock::new()),
            LockKind::LocalSpin => Box::new(LocalSpinLock::new()),
            LockKind::ConstantBackoff => Box::new(ConstantBackoffLock::new(backoff)),
            LockKind::ActiveBackoff => Box::new(ConstantBackoffLock::active(
                super::config::ACTIVE_BACKOFF_ITERS,
            )),
            LockKind::ExponentialBackoff => Box::new(ExponentialBackoffLock::new(backoff)),
            LockKind::RandomBackoff => Box::new(match config.seed {
                Some(seed) => RandomBackoffLock::with_seed(backoff, seed),
                None => RandomBackoffLock::new(backoff),
            }),
            LockKind::Ticket => Box::new(TicketLock::new()),
            LockKind::PlatformMutex => Box::new(PlatformMutex::new()),
            #[cfg(target_os = "linux")]
            LockKind::PthreadSpinLock => Box::new(PthreadSpinLock::new()?),
            #[cfg(not(target_os = "linux"))]
            LockKind::PthreadSpinLock => {
                return Err(crate::core::errors::ConfigError::Unsupported("pthread_spinlock").into())
            }
        };
        Ok(lock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_matches_kind() {
        let config = LockConfig::default().with_seed(9);
        for kind in LockKind::ALL.into_iter().filter(LockKind::is_supported) {
            let lock = kind.build(&config).unwrap();
            assert_eq!(lock.name(), kind.as_str());
            assert!(!lock.is_locked());
        }
    }

    #[test]
    fn test_boxed_lock_protects_data() {
        let lock = LockKind::Ticket.build(&LockConfig::default()).unwrap();
        let counter = Locked::new(lock, 0u64);
        for _ in 0..100 {
            *counter.lock() += 1;
        }
        assert_eq!(counter.into_inner(), 100);
    }
}
