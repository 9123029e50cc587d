/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 *
 * The lock primitives themselves have no failure values: acquire only delays
 * and release misuse is an unchecked precondition. Everything here belongs to
 * configuration and the benchmark harness.
 */

use miette::Diagnostic;
use thiserror::Error;

/// Result alias for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result alias for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Minimum backoff must be at least 1 (got 0)")]
    #[diagnostic(
        code(config::zero_backoff),
        help("A zero magnitude never delays and can never double. Use 1 or more.")
    )]
    ZeroBackoff,

    #[error("Backoff bounds inverted: min {min} > max {max}")]
    #[diagnostic(
        code(config::inverted_backoff),
        help("MIN_BACKOFF must not exceed MAX_BACKOFF.")
    )]
    InvertedBackoff { min: u32, max: u32 },

    #[error("Thread count must be positive")]
    #[diagnostic(
        code(config::zero_threads),
        help("Contention needs at least one worker thread.")
    )]
    ZeroThreads,

    #[error("Thread sweep is empty")]
    #[diagnostic(
        code(config::empty_sweep),
        help("Provide at least one thread count or a positive parallelism.")
    )]
    EmptySweep,

    #[error("{0} must be positive")]
    #[diagnostic(
        code(config::zero_count),
        help("Iteration and trial counts must be at least 1.")
    )]
    ZeroCount(&'static str),

    #[error("No lock strategies selected")]
    #[diagnostic(
        code(config::no_locks),
        help("Set LOCKBENCH_LOCKS to a comma-separated list, e.g. naive,ticket.")
    )]
    NoLocks,

    #[error("Unknown lock strategy: {0}")]
    #[diagnostic(
        code(config::unknown_lock),
        help("Known strategies: naive, local_spin, constant_backoff, active_backoff, exponential_backoff, random_backoff, ticket, platform_mutex, pthread_spinlock.")
    )]
    UnknownLock(String),

    #[error("Invalid value for {var}: {value:?}")]
    #[diagnostic(
        code(config::invalid_env),
        help("Check the environment variable's expected format.")
    )]
    InvalidEnv { var: &'static str, value: String },

    #[error("Lock strategy {0} is not available on this platform")]
    #[diagnostic(
        code(config::unsupported_lock),
        help("Remove it from the selection on this target.")
    )]
    Unsupported(&'static str),
}

/// Benchmark harness errors
#[derive(Error, Debug, Diagnostic)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Worker thread {index} panicked")]
    #[diagnostic(
        code(harness::worker_panicked),
        help("A worker panicked inside the critical section. The trial result is discarded.")
    )]
    WorkerPanicked { index: usize },

    #[error("Lost count: expected {expected}, counter holds {actual}")]
    #[diagnostic(
        code(harness::lost_update),
        help("The lock failed to provide mutual exclusion. This is a correctness bug in the strategy.")
    )]
    LostUpdate { expected: u64, actual: u64 },

    #[error("Budget of {total} not matched: counter holds {counter}, workers claimed {claimed}")]
    #[diagnostic(
        code(harness::budget_mismatch),
        help("A counter off the budget means lost updates; claims off the counter mean a worker miscounted its own increments.")
    )]
    BudgetMismatch { total: u64, counter: u64, claimed: u64 },

    #[error("Report serialization failed: {0}")]
    #[diagnostic(code(harness::serialization))]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(harness::io_error),
        help("Writing the report failed. Check the path in LOCKBENCH_REPORT.")
    )]
    Io(#[from] std::io::Error),
}
