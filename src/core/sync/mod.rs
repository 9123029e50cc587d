/*!
 * Synchronization Primitives
 *
 * Spin-based mutual exclusion for short critical sections under contention:
 * - Naive test-and-set for reference
 * - Test-and-test-and-set with pluggable backoff (constant, exponential, randomized)
 * - Ticket lock for strict FIFO fairness
 *
 * # Architecture
 *
 * Every strategy implements the `RawLock` capability (acquire, try-acquire,
 * release). `Locked<L, T>` layers data ownership and an RAII guard on top, so
 * callers never pair acquire and release by hand.
 *
 * # Performance
 *
 * - Lock words are cache-line padded to prevent false sharing
 * - Uncontended acquire is a single atomic read-modify-write
 * - Backoff state is created only on the contended path, on the waiter's stack
 * - No parking: waiting is busy-waiting plus processor pause hints
 */

pub mod backoff;
mod config;
mod locks;

pub use config::{
    BackoffConfig, LockConfig, LockKind, ACTIVE_BACKOFF_ITERS, CONSTANT_BACKOFF_ITERS,
    MAX_BACKOFF, MIN_BACKOFF,
};
pub use locks::{
    ConstantBackoffLock, ExponentialBackoffLock, LocalSpinLock, LockGuard, Locked, NaiveSpinLock,
    PlatformMutex, RandomBackoffLock, RawLock, TicketLock, TtasLock,
};

#[cfg(target_os = "linux")]
pub use locks::PthreadSpinLock;
