/*!
 * Exponential Backoff
 *
 * Delay starts at the minimum and doubles after every failed poll until it
 * saturates at the maximum. Long queues therefore poll slowly while a lightly
 * contended lock is still noticed quickly.
 */

use super::traits::{Backoff, BackoffPolicy, Delay};
use crate::core::sync::config::BackoffConfig;

/// Policy holding the doubling bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialPolicy {
    min: u32,
    max: u32,
    delay: Delay,
}

impl ExponentialPolicy {
    pub fn new(config: &BackoffConfig) -> Self {
        Self {
            min: config.min(),
            max: config.max(),
            delay: config.delay,
        }
    }
}

impl Default for ExponentialPolicy {
    fn default() -> Self {
        Self::new(&BackoffConfig::default())
    }
}

impl BackoffPolicy for ExponentialPolicy {
    type Backoff = ExponentialBackoff;

    #[inline]
    fn start(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current: self.min,
            max: self.max,
            delay: self.delay,
        }
    }

    fn name(&self) -> &'static str {
        "exponential_backoff"
    }
}

/// Stack-local doubling state
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    current: u32,
    max: u32,
    delay: Delay,
}

impl Backoff for ExponentialBackoff {
    #[inline(always)]
    fn magnitude(&self) -> u32 {
        self.current
    }

    #[inline]
    fn advance(&mut self) {
        self.current = self.current.saturating_mul(2).min(self.max);
    }

    #[inline(always)]
    fn delay(&self) -> Delay {
        self.delay
    }
}
