/*!
 * Lock Capability
 *
 * The one contract every strategy implements.
 *
 * # Memory ordering
 *
 * The transition free → held is a read with `Acquire` semantics and the
 * transition held → free is a write with `Release` semantics. Every write made
 * by a previous holder before `release` is therefore visible to the next
 * holder after its `acquire` returns, which is what lets [`Locked`] hand out
 * `&mut T` to unsynchronized data.
 *
 * [`Locked`]: super::Locked
 */

use std::sync::Arc;

/// Raw mutual exclusion without associated data
///
/// # Safety
///
/// Implementors must guarantee that between a returning `acquire` (or a
/// `try_acquire` returning `true`) and the matching `release`, no other
/// caller's `acquire` returns or `try_acquire` succeeds, and that the
/// acquire/release pair forms a happens-before edge.
pub unsafe trait RawLock: Send + Sync {
    /// Block (spin) until the caller holds the lock
    ///
    /// Cannot fail, only delay. Not re-entrant: acquiring twice on one thread
    /// without releasing never returns.
    fn acquire(&self);

    /// Single non-blocking attempt
    fn try_acquire(&self) -> bool;

    /// Make the lock available to the next acquirer
    ///
    /// # Safety
    ///
    /// The calling context must currently hold the lock.
    unsafe fn release(&self);

    /// Racy snapshot of whether someone holds the lock
    fn is_locked(&self) -> bool;

    /// Strategy name used in reports and logs
    fn name(&self) -> &'static str;
}

unsafe impl<L: RawLock + ?Sized> RawLock for Box<L> {
    #[inline(always)]
    fn acquire(&self) {
        (**self).acquire()
    }

    #[inline(always)]
    fn try_acquire(&self) -> bool {
        (**self).try_acquire()
    }

    #[inline(always)]
    unsafe fn release(&self) {
        (**self).release()
    }

    fn is_locked(&self) -> bool {
        (**self).is_locked()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

unsafe impl<L: RawLock + ?Sized> RawLock for Arc<L> {
    #[inline(always)]
    fn acquire(&self) {
        (**self).acquire()
    }

    #[inline(always)]
    fn try_acquire(&self) -> bool {
        (**self).try_acquire()
    }

    #[inline(always)]
    unsafe fn release(&self) {
        (**self).release()
    }

    fn is_locked(&self) -> bool {
        (**self).is_locked()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
