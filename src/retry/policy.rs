//! Retry policy configuration and wait-time computation.

use backoff::ExponentialBackoff;
use backoff::ExponentialBackoffBuilder;
use rand::Rng;
use std::time::Duration;

use crate::error::ConfigError;

/// Fraction of the base wait added as random jitter.
pub const JITTER_FACTOR: f64 = 0.1;

/// Retry policy configuration
///
/// Immutable once built; one instance per call site.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (`0` means exactly one attempt)
    pub max_retries: u32,
    /// Wait before the first retry
    pub initial_delay: Duration,
    /// Ceiling for every computed wait, jitter included
    pub max_delay: Duration,
    /// Growth factor applied to the delay after each retry
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy that never retries.
    pub fn no_retry() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Set maximum retries
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set initial delay
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set maximum delay
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set backoff multiplier
    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Reject policies the engine cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.backoff_multiplier.is_finite() && self.backoff_multiplier > 1.0) {
            return Err(ConfigError::InvalidRetryPolicy(format!(
                "backoff multiplier must be greater than 1, got {}",
                self.backoff_multiplier
            )));
        }
        if self.initial_delay > self.max_delay {
            return Err(ConfigError::InvalidRetryPolicy(format!(
                "initial delay {:?} exceeds max delay {:?}",
                self.initial_delay, self.max_delay
            )));
        }
        Ok(())
    }

    /// Exponential delay schedule: `initial_delay`, then multiplied by
    /// `backoff_multiplier` after every step, capped at `max_delay`.
    ///
    /// Randomization is disabled here; jitter is applied by [`Self::wait_for`]
    /// so that it also covers `Retry-After` overrides.
    pub(crate) fn schedule(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_delay)
            .with_randomization_factor(0.0)
            .with_multiplier(self.backoff_multiplier)
            .with_max_interval(self.max_delay)
            .with_max_elapsed_time(None)
            .build()
    }

    /// Final wait for a given base: base plus up to 10% jitter, capped at
    /// `max_delay`.
    pub fn wait_for(&self, base: Duration) -> Duration {
        let jitter_range = base.as_secs_f64() * JITTER_FACTOR;
        let sample = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(0.0..=jitter_range)
        } else {
            0.0
        };
        self.wait_with_jitter(base, sample)
    }

    /// Deterministic variant of [`Self::wait_for`]; `jitter_secs` is clamped
    /// into `[0, 0.1 × base]`.
    pub fn wait_with_jitter(&self, base: Duration, jitter_secs: f64) -> Duration {
        let max_jitter = base.as_secs_f64() * JITTER_FACTOR;
        let jitter = if jitter_secs.is_finite() {
            jitter_secs.clamp(0.0, max_jitter)
        } else {
            0.0
        };
        base.saturating_add(Duration::from_secs_f64(jitter))
            .min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoff::backoff::Backoff;

    fn policy() -> RetryPolicy {
        RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(500))
            .with_backoff_multiplier(2.0)
    }

    #[test]
    fn schedule_doubles_until_the_ceiling() {
        let mut schedule = policy().schedule();
        let delays: Vec<u128> = (0..5)
            .map(|_| schedule.next_backoff().unwrap().as_millis())
            .collect();
        assert_eq!(delays, vec![100, 200, 400, 500, 500]);
    }

    #[test]
    fn jitter_stays_within_ten_percent() {
        let policy = RetryPolicy::new().with_max_delay(Duration::from_secs(60));
        let base = Duration::from_secs(5);
        for _ in 0..200 {
            let wait = policy.wait_for(base);
            assert!(wait >= base);
            assert!(wait <= Duration::from_millis(5500));
        }
    }

    #[test]
    fn wait_never_exceeds_max_delay() {
        let policy = policy();
        for base_ms in [0u64, 50, 480, 500, 10_000] {
            for _ in 0..50 {
                let wait = policy.wait_for(Duration::from_millis(base_ms));
                assert!(wait <= policy.max_delay, "{wait:?} for base {base_ms}");
            }
        }
        assert_eq!(
            policy.wait_with_jitter(Duration::from_millis(480), 1.0),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn out_of_range_jitter_is_clamped() {
        let policy = RetryPolicy::new().with_max_delay(Duration::from_secs(60));
        let base = Duration::from_secs(2);
        assert_eq!(policy.wait_with_jitter(base, -4.0), base);
        assert_eq!(
            policy.wait_with_jitter(base, 99.0),
            Duration::from_millis(2200)
        );
        assert_eq!(policy.wait_with_jitter(base, f64::NAN), base);
    }

    #[test]
    fn validate_rejects_non_growing_multipliers() {
        assert!(policy().validate().is_ok());
        assert!(policy().with_backoff_multiplier(1.0).validate().is_err());
        assert!(policy().with_backoff_multiplier(f64::NAN).validate().is_err());
        assert!(
            policy()
                .with_initial_delay(Duration::from_secs(10))
                .validate()
                .is_err()
        );
    }
}
