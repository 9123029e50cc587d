/*!
 * Contention Benchmark Harness
 *
 * Sweeps thread counts × strategies × trials, building a fresh lock and
 * counter for every trial, and collects the timings into a `RunReport`.
 */

mod config;
mod report;
mod runner;
mod stats;

pub use config::{detect_parallelism, HarnessConfig, ThreadSweep, Workload};
pub use report::{RunReport, SweepPoint};
pub use runner::{run_atomic_trial, run_shared_budget, run_trial, TrialOutcome};
pub use stats::Stats;

use crate::core::errors::HarnessResult;
use tracing::{info, info_span};

/// Drives a full sweep described by a [`HarnessConfig`]
#[derive(Debug, Clone)]
pub struct ContentionHarness {
    config: HarnessConfig,
}

impl ContentionHarness {
    /// Validate `config` and prepare a harness
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every (strategy, thread count) point
    pub fn run(&self) -> HarnessResult<RunReport> {
        let mut report = RunReport::new(&self.config);
        let counts = self.config.thread_counts();
        let _run = info_span!("sweep", run_id = %report.run_id).entered();

        info!(
            locks = self.config.locks.len(),
            thread_counts = ?counts,
            trials = self.config.trials,
            "Starting contention sweep"
        );

        for &kind in &self.config.locks {
            let _lock = info_span!("strategy", lock = %kind).entered();
            for &threads in &counts {
                let trials = (0..self.config.trials)
                    .map(|_| {
                        let lock = kind.build(&self.config.lock)?;
                        run_trial(lock, threads, &self.config.workload)
                    })
                    .collect::<HarnessResult<Vec<_>>>()?;

                if let Some(point) = SweepPoint::from_trials(kind, threads, &trials) {
                    info!(
                        threads,
                        mean_ms = point.elapsed.mean,
                        stddev_ms = point.elapsed.stddev,
                        throughput = point.throughput,
                        "Point complete"
                    );
                    report.points.push(point);
                }
            }
        }

        info!(points = report.points.len(), "Sweep complete");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{ConfigError, HarnessError};
    use crate::core::sync::LockKind;

    #[test]
    fn test_rejects_invalid_config() {
        let result = ContentionHarness::new(HarnessConfig::for_parallelism(0));
        assert!(matches!(
            result,
            Err(HarnessError::Config(ConfigError::EmptySweep))
        ));
    }

    #[test]
    fn test_small_sweep() {
        let config = HarnessConfig {
            sweep: ThreadSweep::Fixed(vec![1, 2]),
            workload: Workload::new(200, 2),
            trials: 2,
            locks: vec![LockKind::Naive, LockKind::Ticket],
            ..HarnessConfig::for_parallelism(2)
        };
        let report = ContentionHarness::new(config).unwrap().run().unwrap();

        assert_eq!(report.points.len(), 4);
        assert_eq!(report.points_for(LockKind::Ticket).count(), 2);
        assert!(report.points.iter().all(|p| p.elapsed.samples == 2));
    }
}
