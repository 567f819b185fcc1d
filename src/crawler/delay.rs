//! Request pacing
//!
//! Every fetch after the first waits `base + U(0,1) * jitter`. The random
//! component keeps requests from arriving at a fixed, fingerprintable
//! interval.

use crate::config::{validate_seconds, CrawlConfig};
use crate::ConfigError;
use rand::Rng;
use std::time::Duration;

/// Delay policy applied between consecutive page fetches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayPolicy {
    /// Fixed part of every wait
    base: Duration,

    /// Upper bound of the uniformly distributed extra wait
    jitter: Duration,
}

impl DelayPolicy {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// Builds the policy from the configured delay and jitter (in seconds)
    ///
    /// Fails on negative, non-finite, or out-of-range values.
    pub fn from_config(config: &CrawlConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            validate_seconds("delay", config.delay_secs)?,
            validate_seconds("jitter", config.jitter_secs)?,
        ))
    }

    /// A policy that never waits
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Draws the wait before the next request using the given random source
    pub fn next_delay_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let draw: f64 = rng.gen_range(0.0..=1.0);
        let extra =
            Duration::try_from_secs_f64(self.jitter.as_secs_f64() * draw).unwrap_or(self.jitter);
        self.base.checked_add(extra).unwrap_or(Duration::MAX)
    }

    /// Draws the wait before the next request
    pub fn next_delay(&self) -> Duration {
        self.next_delay_with(&mut rand::thread_rng())
    }
}
