/*!
 * Randomized Backoff
 *
 * Each failed poll redraws the delay uniformly from `[min, max]`, so threads
 * that became ready at the same instant stop retrying in lockstep.
 *
 * # Seeding
 *
 * A policy owns an explicit seed. Every contended acquire takes the next
 * value of a per-instance stream counter and seeds a private `SmallRng`
 * from `(seed, stream)`. Concurrent acquirers therefore draw from distinct
 * streams, no generator state is shared between threads, and a fixed seed
 * reproduces the same family of streams.
 */

use super::traits::{Backoff, BackoffPolicy, Delay};
use crate::core::sync::config::BackoffConfig;
use crossbeam_utils::CachePadded;
use rand::distributions::Uniform;
use rand::rngs::{OsRng, SmallRng};
use rand::{Rng, RngCore, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};

/// Golden-ratio increment spreading consecutive stream ids across the seed space
const STREAM_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Policy holding the draw bounds and the instance seed
#[derive(Debug)]
pub struct RandomizedPolicy {
    dist: Uniform<u32>,
    min: u32,
    delay: Delay,
    seed: u64,
    // Touched once per contended acquire; kept off the lock word's line
    streams: CachePadded<AtomicU64>,
}

impl RandomizedPolicy {
    /// Create a policy with an explicit seed
    pub fn with_seed(config: &BackoffConfig, seed: u64) -> Self {
        Self {
            dist: Uniform::new_inclusive(config.min(), config.max()),
            min: config.min(),
            delay: config.delay,
            seed,
            streams: CachePadded::new(AtomicU64::new(0)),
        }
    }

    /// Create a policy seeded from OS entropy
    pub fn new(config: &BackoffConfig) -> Self {
        Self::with_seed(config, OsRng.next_u64())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Backoff state for a given stream, independent of the shared counter
    pub fn stream(&self, stream: u64) -> RandomBackoff {
        RandomBackoff {
            rng: SmallRng::seed_from_u64(self.seed ^ stream.wrapping_mul(STREAM_GAMMA)),
            dist: self.dist,
            current: self.min,
            delay: self.delay,
        }
    }
}

impl Default for RandomizedPolicy {
    fn default() -> Self {
        Self::new(&BackoffConfig::default())
    }
}

impl BackoffPolicy for RandomizedPolicy {
    type Backoff = RandomBackoff;

    #[inline]
    fn start(&self) -> RandomBackoff {
        self.stream(self.streams.fetch_add(1, Ordering::Relaxed))
    }

    fn name(&self) -> &'static str {
        "random_backoff"
    }
}

/// Stack-local generator and current draw
#[derive(Debug, Clone)]
pub struct RandomBackoff {
    rng: SmallRng,
    dist: Uniform<u32>,
    current: u32,
    delay: Delay,
}

impl RandomBackoff {
    /// Draw the next magnitude and return it
    #[inline]
    pub fn draw(&mut self) -> u32 {
        self.current = self.rng.sample(self.dist);
        self.current
    }
}

impl Backoff for RandomBackoff {
    #[inline(always)]
    fn magnitude(&self) -> u32 {
        self.current
    }

    #[inline]
    fn advance(&mut self) {
        self.draw();
    }

    #[inline(always)]
    fn delay(&self) -> Delay {
        self.delay
    }

    /// Draw first, then wait: every failed poll gets a fresh magnitude
    #[inline]
    fn snooze(&mut self) {
        let units = self.draw();
        self.delay.wait(units);
    }
}
