/*!
 * Contention Locks Library
 * Spin-lock strategies and the harness that measures them under contention
 */

pub mod core;
pub mod harness;
pub mod monitoring;

// Re-exports
pub use crate::core::errors::{ConfigError, HarnessError};
pub use crate::core::sync::{
    BackoffConfig, ConstantBackoffLock, ExponentialBackoffLock, LocalSpinLock, LockConfig,
    LockGuard, LockKind, Locked, NaiveSpinLock, PlatformMutex, RandomBackoffLock, RawLock,
    TicketLock,
};
pub use harness::{ContentionHarness, HarnessConfig, RunReport};
pub use monitoring::init_tracing;
