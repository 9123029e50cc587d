/*!
 * Ticket Lock Fairness Tests
 *
 * FIFO service order, wraparound of the ticket counters, and the
 * naive-vs-ticket fairness scenario.
 */

mod common;

use common::{cores, threads_for, with_timeout, LIVENESS_TIMEOUT};
use contention_locks::core::sync::{Locked, NaiveSpinLock, RawLock, TicketLock};
use contention_locks::harness::{run_shared_budget, run_trial, Stats, Workload};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Spin until `lock` has handed out `tickets` tickets
fn wait_for_tickets(lock: &TicketLock, tickets: u64) {
    while lock.next_ticket() != tickets {
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
#[serial]
fn test_waiters_served_in_arrival_order() {
    let lock = Arc::new(Locked::new(TicketLock::new(), Vec::new()));
    let holder = lock.lock();

    // Each waiter draws its ticket strictly after the previous one
    let waiters: Vec<_> = (0..3)
        .map(|id| {
            let waiter = lock.clone();
            let handle = thread::spawn(move || {
                waiter.lock().push(id);
            });
            wait_for_tickets(lock.raw(), 2 + id as u64);
            handle
        })
        .collect();

    drop(holder);
    for waiter in waiters {
        waiter.join().unwrap();
    }

    assert_eq!(lock.with(|order| order.clone()), vec![0, 1, 2]);
}

#[test]
#[serial]
fn test_tickets_served_without_skips() {
    let threads = threads_for(4, true, 500);
    assert_eq!(threads, 4);
    let lock = Arc::new(TicketLock::new());
    let served = Arc::new(Locked::new(NaiveSpinLock::new(), Vec::new()));

    with_timeout(LIVENESS_TIMEOUT, {
        let lock = lock.clone();
        let served = served.clone();
        move || {
            let handles: Vec<_> = (0..threads)
                .map(|id| {
                    let lock = lock.clone();
                    let served = served.clone();
                    thread::spawn(move || {
                        for _ in 0..500 {
                            let ticket = lock.lock_ticketed();
                            served.lock().push((ticket, id));
                            unsafe { lock.release() };
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        }
    });

    let served = served.with(|s| s.clone());
    let tickets: Vec<u64> = served.iter().map(|&(ticket, _)| ticket).collect();
    let expected: Vec<u64> = (0..(threads as u64 * 500)).collect();
    assert_eq!(tickets, expected);
    assert_eq!(lock.queue_depth(), 0);
}

#[test]
#[serial]
fn test_exclusion_across_wraparound() {
    let threads = threads_for(4, true, 100) as u64;
    assert_eq!(threads, 4);
    let start = u64::MAX - 150;
    let lock = TicketLock::starting_at(start);
    let lock = Arc::new(lock);

    let outcome = with_timeout(LIVENESS_TIMEOUT, {
        let lock = lock.clone();
        move || run_trial(lock, threads as usize, &Workload::new(100, 1))
    })
    .unwrap();

    assert_eq!(outcome.counter, threads * 100);
    assert_eq!(lock.next_ticket(), start.wrapping_add(threads * 100));
    assert_eq!(lock.now_serving(), lock.next_ticket());
    assert!(!lock.is_locked());
}

#[test]
#[serial]
fn test_fifo_order_across_wraparound() {
    let start = u64::MAX - 1;
    let lock = Arc::new(Locked::new(TicketLock::starting_at(start), Vec::new()));
    let holder = lock.lock();

    let waiters: Vec<_> = (0..3)
        .map(|id| {
            let waiter = lock.clone();
            let handle = thread::spawn(move || {
                waiter.lock().push(id);
            });
            wait_for_tickets(lock.raw(), start.wrapping_add(2 + id as u64));
            handle
        })
        .collect();

    drop(holder);
    for waiter in waiters {
        waiter.join().unwrap();
    }

    assert_eq!(lock.with(|order| order.clone()), vec![0, 1, 2]);
    // Four holders served: MAX-1, MAX, 0, 1
    assert_eq!(lock.raw().now_serving(), 2);
}

#[test]
#[serial]
fn test_scenario_eight_threads_reach_800k() {
    let naive = with_timeout(LIVENESS_TIMEOUT, || {
        run_trial(NaiveSpinLock::new(), 8, &Workload::SMALL)
    })
    .unwrap();
    assert_eq!(naive.counter, 800_000);

    let threads = threads_for(8, true, Workload::SMALL.acquisitions);
    if threads == 8 {
        let ticket = with_timeout(LIVENESS_TIMEOUT, || {
            run_trial(TicketLock::new(), 8, &Workload::SMALL)
        })
        .unwrap();
        assert_eq!(ticket.counter, 800_000);
    } else {
        // Same total with one waiter per core
        let ticket = with_timeout(LIVENESS_TIMEOUT, move || {
            run_shared_budget(TicketLock::new(), threads, 800_000)
        })
        .unwrap();
        assert_eq!(ticket.counter, 800_000);
    }
}

#[test]
#[serial]
fn test_ticket_shares_tighter_than_naive() {
    let threads = threads_for(8, true, 800_000 / 8);
    if cores() < 2 {
        eprintln!("skipping fairness comparison on a single core");
        return;
    }

    let naive = with_timeout(LIVENESS_TIMEOUT, move || {
        run_shared_budget(NaiveSpinLock::new(), threads, 800_000)
    })
    .unwrap();
    let ticket = with_timeout(LIVENESS_TIMEOUT, move || {
        run_shared_budget(TicketLock::new(), threads, 800_000)
    })
    .unwrap();

    assert_eq!(naive.counter, 800_000);
    assert_eq!(ticket.counter, 800_000);

    let naive_spread = Stats::from_counts(&naive.per_thread).unwrap().relative_spread();
    let ticket_spread = Stats::from_counts(&ticket.per_thread).unwrap().relative_spread();
    eprintln!(
        "threads={threads} naive_spread={naive_spread:.4} ticket_spread={ticket_spread:.4}"
    );
    assert!(threads > 1);
    assert!(
        ticket_spread < naive_spread,
        "ticket spread {ticket_spread} not tighter than naive spread {naive_spread}"
    );
}
