/*!
 * Lock Configuration
 *
 * Backoff bounds and strategy selection for the lock family
 */

use super::backoff::Delay;
use crate::core::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest backoff magnitude (pause iterations)
pub const MIN_BACKOFF: u32 = 4;
/// Largest backoff magnitude (pause iterations)
pub const MAX_BACKOFF: u32 = 1 << 10;
/// Pause hints per failed poll for constant backoff
pub const CONSTANT_BACKOFF_ITERS: u32 = 4;
/// Busy-loop iterations per failed poll for active backoff
pub const ACTIVE_BACKOFF_ITERS: u32 = 100;

/// Backoff parameters shared by the backoff-capable strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    min: u32,
    max: u32,
    /// Delay units per failed poll for constant backoff
    pub constant_iters: u32,
    /// What one delay unit costs
    pub delay: Delay,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min: MIN_BACKOFF,
            max: MAX_BACKOFF,
            constant_iters: CONSTANT_BACKOFF_ITERS,
            delay: Delay::Pause,
        }
    }
}

impl BackoffConfig {
    /// Create a validated configuration with `min..=max` bounds
    pub fn new(min: u32, max: u32) -> ConfigResult<Self> {
        if min == 0 {
            return Err(ConfigError::ZeroBackoff);
        }
        if min > max {
            return Err(ConfigError::InvertedBackoff { min, max });
        }
        Ok(Self {
            min,
            max,
            ..Self::default()
        })
    }

    /// Short waits expected: keep the ceiling low so release is noticed fast
    pub const fn low_latency() -> Self {
        Self {
            min: 1,
            max: 64,
            constant_iters: 1,
            delay: Delay::Pause,
        }
    }

    /// Many waiters expected: start higher and allow long pauses
    pub const fn high_contention() -> Self {
        Self {
            min: 16,
            max: 4096,
            constant_iters: 16,
            delay: Delay::Pause,
        }
    }

    /// Busy-loop constant backoff, as in the "active" variant
    pub const fn active() -> Self {
        Self {
            min: MIN_BACKOFF,
            max: MAX_BACKOFF,
            constant_iters: ACTIVE_BACKOFF_ITERS,
            delay: Delay::Busy,
        }
    }

    #[inline(always)]
    pub fn min(&self) -> u32 {
        self.min
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max
    }
}

/// Every lock strategy the crate can construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockKind {
    /// Test-and-set on every poll
    Naive,
    /// Test-and-test-and-set
    LocalSpin,
    /// Fixed pause count per failed poll
    ConstantBackoff,
    /// Fixed busy-loop count per failed poll
    ActiveBackoff,
    /// Doubling delay, capped
    ExponentialBackoff,
    /// Uniformly redrawn delay
    RandomBackoff,
    /// FIFO ticket lock
    Ticket,
    /// Platform mutex baseline (parking_lot)
    PlatformMutex,
    /// POSIX spinlock baseline
    PthreadSpinLock,
}

impl LockKind {
    /// All strategies, in order of sophistication
    pub const ALL: [LockKind; 9] = [
        LockKind::Naive,
        LockKind::LocalSpin,
        LockKind::ConstantBackoff,
        LockKind::ActiveBackoff,
        LockKind::ExponentialBackoff,
        LockKind::RandomBackoff,
        LockKind::Ticket,
        LockKind::PlatformMutex,
        LockKind::PthreadSpinLock,
    ];

    /// The spin strategies implemented in this crate
    pub const SPIN: [LockKind; 7] = [
        LockKind::Naive,
        LockKind::LocalSpin,
        LockKind::ConstantBackoff,
        LockKind::ActiveBackoff,
        LockKind::ExponentialBackoff,
        LockKind::RandomBackoff,
        LockKind::Ticket,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            LockKind::Naive => "naive",
            LockKind::LocalSpin => "local_spin",
            LockKind::ConstantBackoff => "constant_backoff",
            LockKind::ActiveBackoff => "active_backoff",
            LockKind::ExponentialBackoff => "exponential_backoff",
            LockKind::RandomBackoff => "random_backoff",
            LockKind::Ticket => "ticket",
            LockKind::PlatformMutex => "platform_mutex",
            LockKind::PthreadSpinLock => "pthread_spinlock",
        }
    }

    /// Whether this strategy hands the lock over in arrival order
    pub const fn is_fifo(&self) -> bool {
        matches!(self, LockKind::Ticket)
    }

    /// Whether this target can construct the strategy
    pub const fn is_supported(&self) -> bool {
        match self {
            LockKind::PthreadSpinLock => cfg!(target_os = "linux"),
            _ => true,
        }
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        LockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownLock(s.trim().to_string()))
    }
}

/// Construction parameters passed to `LockKind::build`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    pub backoff: BackoffConfig,
    /// Seed for randomized backoff; `None` draws one from OS entropy
    pub seed: Option<u64>,
}

impl LockConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }
}
