/*!
 * Mutual Exclusion and Liveness Tests
 *
 * Every strategy, several thread counts, several critical-section counts:
 * the unsynchronized counter must end at exactly threads × count.
 */

mod common;

use common::{cores, threads_for, with_timeout, LIVENESS_TIMEOUT};
use contention_locks::core::sync::{LockConfig, LockKind, RawLock, TicketLock};
use contention_locks::harness::{run_trial, Workload};
use serial_test::serial;
use std::cell::UnsafeCell;
use std::sync::Arc;
use std::thread;

fn supported() -> impl Iterator<Item = LockKind> {
    LockKind::ALL.into_iter().filter(LockKind::is_supported)
}

fn assert_exclusion(kind: LockKind, requested: usize, count: u64) {
    let threads = threads_for(requested, kind.is_fifo(), count);
    let outcome = with_timeout(LIVENESS_TIMEOUT, move || {
        let lock = kind.build(&LockConfig::default().with_seed(17)).unwrap();
        run_trial(lock, threads, &Workload::new(count, 1))
    })
    .unwrap_or_else(|e| panic!("{kind} with {threads} threads × {count}: {e}"));

    assert_eq!(
        outcome.counter,
        threads as u64 * count,
        "{kind} lost updates with {threads} threads × {count}"
    );
}

#[test]
fn test_fifo_runs_at_requested_count_below_convoy_threshold() {
    for count in [1, 100, 1_000] {
        assert_eq!(threads_for(8, true, count), 8);
    }
    assert_eq!(threads_for(8, false, 100_000), 8);
    assert_eq!(threads_for(8, true, 100_000), 8.min(cores()));
}

#[test]
#[serial]
fn test_ticket_contended_at_every_requested_count() {
    for threads in [2, 4, 8] {
        for count in [1, 100, 1_000] {
            let outcome = with_timeout(LIVENESS_TIMEOUT, move || {
                run_trial(TicketLock::new(), threads, &Workload::new(count, 1))
            })
            .unwrap();
            assert_eq!(outcome.threads, threads);
            assert_eq!(outcome.per_thread, vec![count; threads]);
            assert_eq!(outcome.counter, threads as u64 * count);
        }
    }
}

#[test]
#[serial]
fn test_exclusion_one_increment() {
    for kind in supported() {
        for threads in [1, 2, 4, 8] {
            assert_exclusion(kind, threads, 1);
        }
    }
}

#[test]
#[serial]
fn test_exclusion_hundred_increments() {
    for kind in supported() {
        for threads in [1, 2, 4, 8] {
            assert_exclusion(kind, threads, 100);
        }
    }
}

#[test]
#[serial]
fn test_exclusion_thousand_increments() {
    for kind in supported() {
        for threads in [1, 2, 4, 8] {
            assert_exclusion(kind, threads, 1_000);
        }
    }
}

#[test]
#[serial]
fn test_exclusion_long_critical_sections() {
    for kind in LockKind::SPIN {
        let threads = threads_for(4, kind.is_fifo(), 100);
        let outcome = with_timeout(LIVENESS_TIMEOUT, move || {
            let lock = kind.build(&LockConfig::default()).unwrap();
            run_trial(lock, threads, &Workload::new(100, 1_000))
        })
        .unwrap();
        assert_eq!(outcome.counter, threads as u64 * 100_000, "{kind}");
    }
}

/// Counter guarded only by a raw lock's acquire/release, no wrapper
struct RawCounter<L> {
    lock: L,
    value: UnsafeCell<u64>,
}

// SAFETY: value is only touched between acquire and release
unsafe impl<L: RawLock> Sync for RawCounter<L> {}

#[test]
#[serial]
fn test_raw_acquire_release_pairs() {
    for kind in LockKind::SPIN {
        let threads = threads_for(4, kind.is_fifo(), 1_000);
        let shared = Arc::new(RawCounter {
            lock: kind.build(&LockConfig::default()).unwrap(),
            value: UnsafeCell::new(0),
        });

        let total = with_timeout(LIVENESS_TIMEOUT, {
            let shared = shared.clone();
            move || {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let shared = shared.clone();
                        thread::spawn(move || {
                            for _ in 0..1_000 {
                                shared.lock.acquire();
                                // SAFETY: lock held
                                unsafe { *shared.value.get() += 1 };
                                unsafe { shared.lock.release() };
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
                shared.lock.acquire();
                let total = unsafe { *shared.value.get() };
                unsafe { shared.lock.release() };
                total
            }
        });

        assert_eq!(total, threads as u64 * 1_000, "{kind}");
        assert!(!shared.lock.is_locked());
    }
}

#[test]
fn test_single_thread_sequences_never_block() {
    for kind in supported() {
        with_timeout(LIVENESS_TIMEOUT, move || {
            let lock = kind.build(&LockConfig::default()).unwrap();
            for _ in 0..10_000 {
                lock.acquire();
                unsafe { lock.release() };
            }
            assert!(!lock.is_locked(), "{kind} left locked");
        });
    }
}

#[test]
fn test_try_acquire_fails_while_held() {
    for kind in supported() {
        let lock = kind.build(&LockConfig::default()).unwrap();
        lock.acquire();
        assert!(!lock.try_acquire(), "{kind} allowed a second holder");
        unsafe { lock.release() };
        assert!(lock.try_acquire(), "{kind} stayed locked after release");
        unsafe { lock.release() };
    }
}
