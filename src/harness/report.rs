/*!
 * Benchmark Reports
 * Serializable sweep results, tagged with a run id for correlation
 */

use super::config::{HarnessConfig, Workload};
use super::runner::TrialOutcome;
use super::stats::Stats;
use crate::core::errors::HarnessResult;
use crate::core::sync::LockKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// All trials for one (strategy, thread count) point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub lock: LockKind,
    pub threads: usize,
    /// Wall-clock milliseconds per trial
    pub elapsed_ms: Vec<f64>,
    /// Summary of `elapsed_ms`
    pub elapsed: Stats,
    /// Mean acquisitions per second
    pub throughput: f64,
}

impl SweepPoint {
    /// Summarize the trials of one point; `None` without trials
    pub fn from_trials(lock: LockKind, threads: usize, trials: &[TrialOutcome]) -> Option<Self> {
        let elapsed_ms: Vec<f64> = trials
            .iter()
            .map(|t| t.elapsed.as_secs_f64() * 1_000.0)
            .collect();
        let elapsed = Stats::from_samples(&elapsed_ms)?;
        let throughput = trials.iter().map(TrialOutcome::throughput).sum::<f64>() / trials.len() as f64;

        Some(Self {
            lock,
            threads,
            elapsed_ms,
            elapsed,
            throughput,
        })
    }
}

/// A complete harness run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub parallelism: usize,
    pub workload: Workload,
    pub trials: usize,
    pub points: Vec<SweepPoint>,
}

impl RunReport {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            parallelism: config.parallelism,
            workload: config.workload,
            trials: config.trials,
            points: Vec::new(),
        }
    }

    /// Points for one strategy, in sweep order
    pub fn points_for(&self, lock: LockKind) -> impl Iterator<Item = &SweepPoint> {
        self.points.iter().filter(move |p| p.lock == lock)
    }

    pub fn to_json(&self) -> HarnessResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> HarnessResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> HarnessResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn outcome(ms: u64) -> TrialOutcome {
        TrialOutcome {
            threads: 2,
            elapsed: Duration::from_millis(ms),
            counter: 2_000,
            per_thread: vec![1_000, 1_000],
        }
    }

    #[test]
    fn test_point_summary() {
        let point = SweepPoint::from_trials(LockKind::Ticket, 2, &[outcome(10), outcome(30)]).unwrap();
        assert_eq!(point.elapsed_ms, vec![10.0, 30.0]);
        assert!((point.elapsed.mean - 20.0).abs() < 1e-9);
        assert!(point.throughput > 0.0);
    }

    #[test]
    fn test_point_requires_trials() {
        assert!(SweepPoint::from_trials(LockKind::Naive, 1, &[]).is_none());
    }
}
