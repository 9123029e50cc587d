/*!
 * Backoff Policies
 *
 * Delay schedules inserted between failed polls of a busy lock:
 * - None: one spin-wait hint per poll (test-and-test-and-set)
 * - Constant: fixed pause or busy-loop count
 * - Exponential: doubling, saturating at the ceiling
 * - Randomized: uniform redraw from the bounds, explicitly seeded
 */

mod constant;
mod exponential;
mod randomized;
mod traits;

pub use constant::{ConstantBackoff, NoBackoff};
pub use exponential::{ExponentialBackoff, ExponentialPolicy};
pub use randomized::{RandomBackoff, RandomizedPolicy};
pub use traits::{Backoff, BackoffPolicy, Delay};
