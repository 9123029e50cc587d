/*!
 * Platform Baselines
 * Reference locks whose internals belong to the platform, behind the same capability
 */

use super::traits::RawLock;
use parking_lot::lock_api::RawMutex as _;

/// `parking_lot`'s raw mutex: spins briefly, then parks
pub struct PlatformMutex {
    inner: parking_lot::RawMutex,
}

impl PlatformMutex {
    pub const fn new() -> Self {
        Self {
            inner: parking_lot::RawMutex::INIT,
        }
    }
}

impl Default for PlatformMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlatformMutex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformMutex")
            .field("locked", &self.inner.is_locked())
            .finish()
    }
}

unsafe impl RawLock for PlatformMutex {
    #[inline]
    fn acquire(&self) {
        self.inner.lock();
    }

    #[inline]
    fn try_acquire(&self) -> bool {
        self.inner.try_lock()
    }

    #[inline]
    unsafe fn release(&self) {
        self.inner.unlock();
    }

    fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    fn name(&self) -> &'static str {
        "platform_mutex"
    }
}

#[cfg(target_os = "linux")]
pub use pthread::PthreadSpinLock;

#[cfg(target_os = "linux")]
mod pthread {
    use super::RawLock;
    use std::cell::UnsafeCell;
    use std::io;

    /// Process-private POSIX spinlock
    ///
    /// Boxed so the initialized object never moves.
    pub struct PthreadSpinLock {
        inner: Box<UnsafeCell<libc::pthread_spinlock_t>>,
    }

    // SAFETY: pthread spinlocks are designed for concurrent use through a pointer
    unsafe impl Send for PthreadSpinLock {}
    unsafe impl Sync for PthreadSpinLock {}

    impl PthreadSpinLock {
        pub fn new() -> io::Result<Self> {
            let inner = Box::new(UnsafeCell::new(0 as libc::pthread_spinlock_t));
            // SAFETY: pointer is valid and the object is not yet shared
            let rc = unsafe { libc::pthread_spin_init(inner.get(), libc::PTHREAD_PROCESS_PRIVATE) };
            if rc != 0 {
                return Err(io::Error::from_raw_os_error(rc));
            }
            Ok(Self { inner })
        }
    }

    impl std::fmt::Debug for PthreadSpinLock {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("PthreadSpinLock").finish_non_exhaustive()
        }
    }

    impl Drop for PthreadSpinLock {
        fn drop(&mut self) {
            // SAFETY: initialized in new, and &mut self proves it is unlocked and unshared
            unsafe {
                libc::pthread_spin_destroy(self.inner.get());
            }
        }
    }

    unsafe impl RawLock for PthreadSpinLock {
        #[inline]
        fn acquire(&self) {
            // SAFETY: initialized in new
            let rc = unsafe { libc::pthread_spin_lock(self.inner.get()) };
            debug_assert_eq!(rc, 0, "pthread_spin_lock failed");
        }

        #[inline]
        fn try_acquire(&self) -> bool {
            // SAFETY: initialized in new
            unsafe { libc::pthread_spin_trylock(self.inner.get()) == 0 }
        }

        #[inline]
        unsafe fn release(&self) {
            libc::pthread_spin_unlock(self.inner.get());
        }

        /// Probes with a try-lock; briefly takes the lock when free
        fn is_locked(&self) -> bool {
            if self.try_acquire() {
                // SAFETY: just acquired
                unsafe { self.release() };
                false
            } else {
                true
            }
        }

        fn name(&self) -> &'static str {
            "pthread_spinlock"
        }
    }

}
