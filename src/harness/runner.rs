/*!
 * Trial Runner
 *
 * One trial: wrap a fresh lock around a zeroed counter, spawn the workers,
 * join them, and time the whole thing. Threads are created per trial and
 * joined before it ends; nothing outlives the trial.
 */

use super::config::Workload;
use crate::core::errors::{HarnessError, HarnessResult};
use crate::core::hints::black_box;
use crate::core::sync::{Locked, RawLock};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Result of a single trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub threads: usize,
    /// Wall-clock time from first spawn to last join
    pub elapsed: Duration,
    /// Final value of the protected counter
    pub counter: u64,
    /// Acquisitions completed by each worker, in spawn order
    pub per_thread: Vec<u64>,
}

impl TrialOutcome {
    /// Total lock acquisitions across all workers
    pub fn acquisitions(&self) -> u64 {
        self.per_thread.iter().sum()
    }

    /// Acquisitions per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.acquisitions() as f64 / secs
        }
    }
}

/// Every worker performs `workload.acquisitions` critical sections
///
/// Fails with [`HarnessError::LostUpdate`] if the counter does not end at
/// exactly `threads × acquisitions × increments_per_hold`.
#[instrument(level = "debug", skip(lock, workload), fields(strategy = lock.name()))]
pub fn run_trial<L: RawLock>(
    lock: L,
    threads: usize,
    workload: &Workload,
) -> HarnessResult<TrialOutcome> {
    let counter = Locked::new(lock, 0u64);
    let Workload {
        acquisitions,
        increments_per_hold,
    } = *workload;

    let start = Instant::now();
    let per_thread = spawn_workers(threads, None, || {
        for _ in 0..acquisitions {
            let mut value = counter.lock();
            for _ in 0..increments_per_hold {
                *value = black_box(*value + 1);
            }
        }
        acquisitions
    })?;
    let elapsed = start.elapsed();

    let counter = counter.into_inner();
    let expected = workload.expected_total(threads);
    if counter != expected {
        return Err(HarnessError::LostUpdate {
            expected,
            actual: counter,
        });
    }

    debug!(threads, elapsed_us = elapsed.as_micros() as u64, "trial complete");
    Ok(TrialOutcome {
        threads,
        elapsed,
        counter,
        per_thread,
    })
}

/// Workers race for a shared budget of `total` increments
///
/// All workers are released at once from a barrier and keep acquiring until
/// the budget is spent. The split of `total` across workers is the fairness
/// signal: a FIFO lock divides it almost evenly, a barging lock does not.
/// Fails with [`HarnessError::BudgetMismatch`] if the counter or the summed
/// per-worker tallies miss `total`.
#[instrument(level = "debug", skip(lock), fields(strategy = lock.name()))]
pub fn run_shared_budget<L: RawLock>(
    lock: L,
    threads: usize,
    total: u64,
) -> HarnessResult<TrialOutcome> {
    let counter = Locked::new(lock, 0u64);
    let barrier = Barrier::new(threads.max(1));

    let start = Instant::now();
    let per_thread = spawn_workers(threads, Some(&barrier), || {
        let mut mine = 0u64;
        loop {
            let mut value = counter.lock();
            if *value >= total {
                break;
            }
            *value += 1;
            mine += 1;
        }
        mine
    })?;
    let elapsed = start.elapsed();

    let counter = counter.into_inner();
    check_budget(total, counter, per_thread.iter().sum())?;

    Ok(TrialOutcome {
        threads,
        elapsed,
        counter,
        per_thread,
    })
}

/// Both the counter and the workers' own tallies must equal the budget
fn check_budget(total: u64, counter: u64, claimed: u64) -> HarnessResult<()> {
    if counter != total || claimed != total {
        return Err(HarnessError::BudgetMismatch {
            total,
            counter,
            claimed,
        });
    }
    Ok(())
}

/// Lock-free baseline: the same increments as one `fetch_add` each
pub fn run_atomic_trial(threads: usize, workload: &Workload) -> HarnessResult<TrialOutcome> {
    let counter = AtomicU64::new(0);
    let per_hold = workload.increments_per_hold;
    let acquisitions = workload.acquisitions;

    let start = Instant::now();
    let per_thread = spawn_workers(threads, None, || {
        for _ in 0..acquisitions * per_hold {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        acquisitions
    })?;
    let elapsed = start.elapsed();

    let counter = counter.into_inner();
    let expected = workload.expected_total(threads);
    if counter != expected {
        return Err(HarnessError::LostUpdate {
            expected,
            actual: counter,
        });
    }

    Ok(TrialOutcome {
        threads,
        elapsed,
        counter,
        per_thread,
    })
}

/// Spawn `threads` scoped workers running `work`, join them in order
fn spawn_workers<F>(threads: usize, barrier: Option<&Barrier>, work: F) -> HarnessResult<Vec<u64>>
where
    F: Fn() -> u64 + Sync,
{
    let work = &work;
    thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(move || {
                    if let Some(barrier) = barrier {
                        barrier.wait();
                    }
                    work()
                })
            })
            .collect();

        // Join every worker before inspecting results so no panic escapes the scope
        let joined: Vec<_> = handles.into_iter().map(|handle| handle.join()).collect();
        joined
            .into_iter()
            .enumerate()
            .map(|(index, result)| result.map_err(|_| HarnessError::WorkerPanicked { index }))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync::{NaiveSpinLock, TicketLock};

    #[test]
    fn test_trial_counts_exactly() {
        let outcome = run_trial(NaiveSpinLock::new(), 4, &Workload::new(500, 3)).unwrap();
        assert_eq!(outcome.counter, 6_000);
        assert_eq!(outcome.per_thread, vec![500; 4]);
        assert_eq!(outcome.acquisitions(), 2_000);
    }

    #[test]
    fn test_shared_budget_is_fully_spent() {
        let outcome = run_shared_budget(TicketLock::new(), 2, 1_000).unwrap();
        assert_eq!(outcome.counter, 1_000);
        assert_eq!(outcome.acquisitions(), 1_000);
        assert_eq!(outcome.per_thread.len(), 2);
    }

    #[test]
    fn test_budget_mismatch_reports_both_counts() {
        assert!(check_budget(1_000, 1_000, 1_000).is_ok());

        let err = check_budget(1_000, 998, 1_000).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::BudgetMismatch { total: 1_000, counter: 998, claimed: 1_000 }
        ));

        let err = check_budget(1_000, 1_000, 1_003).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::BudgetMismatch { total: 1_000, counter: 1_000, claimed: 1_003 }
        ));
        assert_eq!(
            err.to_string(),
            "Budget of 1000 not matched: counter holds 1000, workers claimed 1003"
        );
    }

    #[test]
    fn test_atomic_baseline() {
        let outcome = run_atomic_trial(3, &Workload::new(1_000, 2)).unwrap();
        assert_eq!(outcome.counter, 6_000);
    }

    #[test]
    fn test_zero_threads_is_empty_trial() {
        let outcome = run_trial(NaiveSpinLock::new(), 0, &Workload::SMALL).unwrap();
        assert_eq!(outcome.counter, 0);
        assert!(outcome.per_thread.is_empty());
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let result = spawn_workers(2, None, || panic!("boom"));
        assert!(matches!(result, Err(HarnessError::WorkerPanicked { index: 0 })));
    }
}
