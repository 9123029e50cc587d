/*!
 * Summary Statistics
 * Mean, spread, and extremes over trial timings or per-thread shares
 */

use serde::{Deserialize, Serialize};

/// Summary of a sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub samples: usize,
    pub mean: f64,
    /// Population standard deviation
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    /// Summarize `samples`; `None` when empty
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });

        Some(Self {
            samples: samples.len(),
            mean,
            stddev: variance.sqrt(),
            min,
            max,
        })
    }

    /// Integer samples such as per-thread acquisition counts
    pub fn from_counts(counts: &[u64]) -> Option<Self> {
        let samples: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        Self::from_samples(&samples)
    }

    /// Coefficient of variation (stddev / mean); 0 for a zero mean
    ///
    /// Used as the fairness measure: 0 means every thread got an equal share.
    pub fn relative_spread(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.stddev / self.mean
        }
    }
}
