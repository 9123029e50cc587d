/*!
 * Shared helpers for the lock integration tests
 */

#![allow(dead_code)]

use std::thread;
use std::time::Duration;

/// Generous bound for any single liveness scenario
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-thread acquisitions above which a FIFO lock is kept to one waiter per core
pub const CONVOY_THRESHOLD: u64 = 10_000;

/// Run `f` on its own thread and fail the test if it does not finish in time
///
/// A stuck spin-lock cannot be cancelled, so on timeout the worker is leaked
/// and the test panics instead of hanging.
pub fn with_timeout<T, F>(timeout: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = flume::bounded(1);
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(timeout)
        .unwrap_or_else(|_| panic!("operation did not complete within {timeout:?}"))
}

/// Host parallelism
pub fn cores() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Thread count for a scenario of `acquisitions` per thread
///
/// A ticket lock convoys when waiters outnumber cores: every hand-off to a
/// descheduled waiter costs a scheduler quantum. That only adds up over long
/// runs, so FIFO locks are capped at the core count above [`CONVOY_THRESHOLD`]
/// acquisitions and run at the requested count otherwise.
pub fn threads_for(requested: usize, fifo: bool, acquisitions: u64) -> usize {
    if fifo && acquisitions > CONVOY_THRESHOLD {
        requested.min(cores()).max(1)
    } else {
        requested
    }
}
