/*!
 * Data-Owning Lock
 * Couples a raw lock with the value it protects and releases through RAII
 */

use super::traits::RawLock;
use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

/// Value protected by a [`RawLock`]
///
/// The value itself is plain memory; exclusion and visibility come entirely
/// from the lock's acquire/release pair.
///
/// # Example
///
/// ```
/// use contention_locks::core::sync::{Locked, TicketLock};
///
/// let counter = Locked::new(TicketLock::new(), 0u64);
/// *counter.lock() += 1;
/// assert_eq!(counter.with(|v| *v), 1);
/// ```
pub struct Locked<L, T: ?Sized> {
    lock: L,
    data: UnsafeCell<T>,
}

unsafe impl<L: RawLock, T: ?Sized + Send> Send for Locked<L, T> {}
unsafe impl<L: RawLock, T: ?Sized + Send> Sync for Locked<L, T> {}

impl<L: RawLock, T> Locked<L, T> {
    pub const fn new(lock: L, value: T) -> Self {
        Self {
            lock,
            data: UnsafeCell::new(value),
        }
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<L: RawLock, T: ?Sized> Locked<L, T> {
    /// Acquire the lock, returning a guard that releases on drop
    #[inline]
    pub fn lock(&self) -> LockGuard<'_, L, T> {
        self.lock.acquire();
        LockGuard {
            owner: self,
            _not_send: PhantomData,
        }
    }

    #[inline]
    pub fn try_lock(&self) -> Option<LockGuard<'_, L, T>> {
        self.lock.try_acquire().then(|| LockGuard {
            owner: self,
            _not_send: PhantomData,
        })
    }

    /// Run `f` inside the critical section
    #[inline]
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Exclusive access without locking, proven by `&mut self`
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// The underlying raw lock
    pub fn raw(&self) -> &L {
        &self.lock
    }
}

impl<L: RawLock + Default, T: Default> Default for Locked<L, T> {
    fn default() -> Self {
        Self::new(L::default(), T::default())
    }
}

impl<L: RawLock, T: ?Sized> fmt::Debug for Locked<L, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locked")
            .field("strategy", &self.lock.name())
            .field("locked", &self.lock.is_locked())
            .finish_non_exhaustive()
    }
}

/// RAII guard; the lock is held for the guard's lifetime
///
/// Not `Send`: platform baselines require release on the acquiring thread.
#[must_use = "if unused the lock is released immediately"]
pub struct LockGuard<'a, L: RawLock, T: ?Sized> {
    owner: &'a Locked<L, T>,
    _not_send: PhantomData<*const ()>,
}

unsafe impl<L: RawLock, T: ?Sized + Sync> Sync for LockGuard<'_, L, T> {}

impl<L: RawLock, T: ?Sized> Deref for LockGuard<'_, L, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        // SAFETY: the guard proves the lock is held
        unsafe { &*self.owner.data.get() }
    }
}

impl<L: RawLock, T: ?Sized> DerefMut for LockGuard<'_, L, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the guard proves the lock is held, and &mut self is unique
        unsafe { &mut *self.owner.data.get() }
    }
}

impl<L: RawLock, T: ?Sized> Drop for LockGuard<'_, L, T> {
    #[inline(always)]
    fn drop(&mut self) {
        // SAFETY: constructed only after a successful acquire
        unsafe { self.owner.lock.release() }
    }
}
