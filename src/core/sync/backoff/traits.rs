/*!
 * Backoff Traits
 *
 * A policy lives inside the lock and is shared by every thread; the backoff
 * state it hands out lives on one acquiring thread's stack for exactly one
 * contended acquire. Nothing in a `Backoff` is ever shared.
 */

use crate::core::hints::{busy_spin, pause};
use serde::{Deserialize, Serialize};

/// Cost of one backoff unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delay {
    /// Processor spin-wait hint (`pause` on x86)
    #[default]
    Pause,
    /// Counting loop kept alive with `black_box`
    Busy,
}

impl Delay {
    /// Spend `units` of this delay
    #[inline]
    pub fn wait(self, units: u32) {
        match self {
            Delay::Pause => pause(units),
            Delay::Busy => busy_spin(units),
        }
    }
}

/// Per-acquire delay state
pub trait Backoff {
    /// Magnitude the next [`snooze`](Backoff::snooze) will wait for
    fn magnitude(&self) -> u32;

    /// Move to the magnitude for the following failed poll, without waiting
    fn advance(&mut self);

    /// Unit cost of this backoff
    fn delay(&self) -> Delay;

    /// Wait after a failed poll, then advance
    #[inline]
    fn snooze(&mut self) {
        self.delay().wait(self.magnitude());
        self.advance();
    }
}

/// Lock-resident factory for per-acquire [`Backoff`] state
pub trait BackoffPolicy: Send + Sync {
    type Backoff: Backoff;

    /// Fresh state for one contended acquire, starting at the minimum
    fn start(&self) -> Self::Backoff;

    /// Strategy name used in reports
    fn name(&self) -> &'static str;
}
