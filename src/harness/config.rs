/*!
 * Harness Configuration
 *
 * Thread sweeps, workload sizes, and strategy selection. Hardware concurrency
 * is never read here: callers pass the parallelism they want to sweep up to,
 * so tests can inject any value deterministically.
 */

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::sync::{BackoffConfig, LockConfig, LockKind};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Fallback when the platform cannot report its parallelism
const FALLBACK_PARALLELISM: usize = 8;

/// Detect how many threads the host can run at once
///
/// Only the binary entry point should call this; everything else takes the
/// value through [`HarnessConfig`].
pub fn detect_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, fallback = FALLBACK_PARALLELISM, "Failed to detect CPU count");
            FALLBACK_PARALLELISM
        })
}

/// Which thread counts to measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadSweep {
    /// Every count from 1 to the parallelism
    Dense,
    /// 1, 2, 4, ... up to and including the parallelism
    Doubling,
    /// Exactly these counts
    Fixed(Vec<usize>),
}

impl ThreadSweep {
    /// Thread counts for a host of `parallelism` threads
    pub fn counts(&self, parallelism: usize) -> Vec<usize> {
        match self {
            ThreadSweep::Dense => (1..=parallelism).collect(),
            ThreadSweep::Doubling => {
                let mut counts: Vec<usize> = std::iter::successors(Some(1usize), |n| n.checked_mul(2))
                    .take_while(|&n| n <= parallelism)
                    .collect();
                if parallelism > 0 && counts.last() != Some(&parallelism) {
                    counts.push(parallelism);
                }
                counts
            }
            ThreadSweep::Fixed(counts) => counts.clone(),
        }
    }
}

impl FromStr for ThreadSweep {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidEnv {
            var: "LOCKBENCH_SWEEP",
            value: s.to_string(),
        };
        match s.trim() {
            "dense" => Ok(ThreadSweep::Dense),
            "doubling" => Ok(ThreadSweep::Doubling),
            list => list
                .split(',')
                .map(|n| n.trim().parse::<usize>().map_err(|_| invalid()))
                .collect::<ConfigResult<Vec<_>>>()
                .map(ThreadSweep::Fixed),
        }
    }
}

/// Size and shape of one worker's critical-section loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Lock acquisitions per worker
    pub acquisitions: u64,
    /// Counter increments per acquisition
    pub increments_per_hold: u64,
}

impl Workload {
    /// 100,000 acquisitions of one increment each
    pub const SMALL: Workload = Workload {
        acquisitions: 100_000,
        increments_per_hold: 1,
    };
    /// 1,000 acquisitions of 100 increments each
    pub const MEDIUM: Workload = Workload {
        acquisitions: 1_000,
        increments_per_hold: 100,
    };
    /// 100 acquisitions of 1,000 increments each
    pub const LARGE: Workload = Workload {
        acquisitions: 100,
        increments_per_hold: 1_000,
    };

    pub const fn new(acquisitions: u64, increments_per_hold: u64) -> Self {
        Self {
            acquisitions,
            increments_per_hold,
        }
    }

    /// Final counter value a correct lock produces with `threads` workers
    pub fn expected_total(&self, threads: usize) -> u64 {
        threads as u64 * self.acquisitions * self.increments_per_hold
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.acquisitions == 0 {
            return Err(ConfigError::ZeroCount("acquisitions"));
        }
        if self.increments_per_hold == 0 {
            return Err(ConfigError::ZeroCount("increments_per_hold"));
        }
        Ok(())
    }
}

impl Default for Workload {
    fn default() -> Self {
        Self::SMALL
    }
}

impl FromStr for Workload {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "small" => Ok(Workload::SMALL),
            "medium" => Ok(Workload::MEDIUM),
            "large" => Ok(Workload::LARGE),
            other => Err(ConfigError::InvalidEnv {
                var: "LOCKBENCH_WORKLOAD",
                value: other.to_string(),
            }),
        }
    }
}

/// Full harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Highest degree of contention the sweep may reach
    pub parallelism: usize,
    pub sweep: ThreadSweep,
    pub workload: Workload,
    /// Repetitions per (strategy, thread count)
    pub trials: usize,
    pub locks: Vec<LockKind>,
    pub lock: LockConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            parallelism: FALLBACK_PARALLELISM,
            sweep: ThreadSweep::Doubling,
            workload: Workload::SMALL,
            trials: 5,
            locks: LockKind::ALL
                .into_iter()
                .filter(LockKind::is_supported)
                .collect(),
            lock: LockConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Default configuration sweeping up to `parallelism` threads
    pub fn for_parallelism(parallelism: usize) -> Self {
        Self {
            parallelism,
            ..Self::default()
        }
    }

    /// Thread counts this configuration will measure
    pub fn thread_counts(&self) -> Vec<usize> {
        self.sweep.counts(self.parallelism)
    }

    /// Check every invariant the harness relies on
    pub fn validate(&self) -> ConfigResult<()> {
        let counts = self.thread_counts();
        if counts.is_empty() {
            return Err(ConfigError::EmptySweep);
        }
        if counts.contains(&0) {
            return Err(ConfigError::ZeroThreads);
        }
        if self.trials == 0 {
            return Err(ConfigError::ZeroCount("trials"));
        }
        if self.locks.is_empty() {
            return Err(ConfigError::NoLocks);
        }
        if let Some(kind) = self.locks.iter().find(|k| !k.is_supported()) {
            return Err(ConfigError::Unsupported(kind.as_str()));
        }
        self.workload.validate()?;
        BackoffConfig::new(self.lock.backoff.min(), self.lock.backoff.max())?;
        Ok(())
    }

    /// Overlay `LOCKBENCH_*` environment variables on the defaults
    ///
    /// Environment variables:
    /// - LOCKBENCH_THREADS: sweep ceiling (default: `parallelism`)
    /// - LOCKBENCH_SWEEP: `dense`, `doubling`, or a comma list (default: doubling)
    /// - LOCKBENCH_WORKLOAD: `small`, `medium`, `large` (default: small)
    /// - LOCKBENCH_TRIALS: repetitions per point (default: 5)
    /// - LOCKBENCH_LOCKS: comma list of strategy names (default: all supported)
    /// - LOCKBENCH_SEED: randomized backoff seed (default: OS entropy)
    pub fn from_env(parallelism: usize) -> ConfigResult<Self> {
        let mut config = Self::for_parallelism(parallelism);

        if let Some(threads) = env_parse::<usize>("LOCKBENCH_THREADS")? {
            config.parallelism = threads;
        }
        if let Some(sweep) = env_parse::<ThreadSweep>("LOCKBENCH_SWEEP")? {
            config.sweep = sweep;
        }
        if let Some(workload) = env_parse::<Workload>("LOCKBENCH_WORKLOAD")? {
            config.workload = workload;
        }
        if let Some(trials) = env_parse::<usize>("LOCKBENCH_TRIALS")? {
            config.trials = trials;
        }
        if let Some(list) = env_var("LOCKBENCH_LOCKS") {
            config.locks = list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse)
                .collect::<ConfigResult<Vec<LockKind>>>()?;
        }
        if let Some(seed) = env_parse::<u64>("LOCKBENCH_SEED")? {
            config.lock = config.lock.with_seed(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

fn env_var(var: &'static str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(var: &'static str) -> ConfigResult<Option<T>> {
    env_var(var)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidEnv { var, value })
        })
        .transpose()
}
