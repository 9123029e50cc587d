/*!
 * Fixed Backoff
 * Pure local spinning and constant-delay polling
 */

use super::traits::{Backoff, BackoffPolicy, Delay};
use crate::core::hints::cpu_relax;

/// No extra delay: one spin-wait hint per poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoBackoff;

impl Backoff for NoBackoff {
    #[inline(always)]
    fn magnitude(&self) -> u32 {
        1
    }

    #[inline(always)]
    fn advance(&mut self) {}

    #[inline(always)]
    fn delay(&self) -> Delay {
        Delay::Pause
    }

    #[inline(always)]
    fn snooze(&mut self) {
        cpu_relax();
    }
}

impl BackoffPolicy for NoBackoff {
    type Backoff = NoBackoff;

    #[inline(always)]
    fn start(&self) -> NoBackoff {
        NoBackoff
    }

    fn name(&self) -> &'static str {
        "local_spin"
    }
}

/// The same number of delay units after every failed poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantBackoff {
    units: u32,
    delay: Delay,
}

impl ConstantBackoff {
    pub const fn new(units: u32, delay: Delay) -> Self {
        Self { units, delay }
    }
}

impl Default for ConstantBackoff {
    fn default() -> Self {
        Self::new(crate::core::sync::config::CONSTANT_BACKOFF_ITERS, Delay::Pause)
    }
}

impl Backoff for ConstantBackoff {
    #[inline(always)]
    fn magnitude(&self) -> u32 {
        self.units
    }

    #[inline(always)]
    fn advance(&mut self) {}

    #[inline(always)]
    fn delay(&self) -> Delay {
        self.delay
    }
}

impl BackoffPolicy for ConstantBackoff {
    type Backoff = ConstantBackoff;

    #[inline(always)]
    fn start(&self) -> ConstantBackoff {
        *self
    }

    fn name(&self) -> &'static str {
        match self.delay {
            Delay::Pause => "constant_backoff",
            Delay::Busy => "active_backoff",
        }
    }
}
