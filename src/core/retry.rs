//! Retry policy for fare queries: how many attempts, and how long to wait
//! between them.

use crate::config::RetrySettings;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Computes the wait before the next attempt. `attempt` is the 1-based
/// number of the attempt that just failed.
pub trait BackoffStrategy: Send + Sync + fmt::Debug {
    fn delay_for_attempt(&self, attempt: u32) -> Duration;
}

/// Doubles (by default) after every failure, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(10),
        }
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if self.initial_delay.is_zero() || base.is_nan() || base <= 0.0 {
            return Duration::ZERO;
        }

        // Near `Duration::MAX` the f64 round trip overflows; the cap wins there.
        Duration::try_from_secs_f64(base.min(self.max_delay.as_secs_f64()))
            .unwrap_or(self.max_delay)
    }
}

/// Waits the same amount after every failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantBackoff {
    pub delay: Duration,
}

impl ConstantBackoff {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn zero() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl BackoffStrategy for ConstantBackoff {
    fn delay_for_attempt(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Arc<dyn BackoffStrategy>,
}

impl RetryPolicy {
    /// `max_attempts` counts the first try; values below 1 are raised to 1.
    pub fn new(max_attempts: u32, backoff: impl BackoffStrategy + 'static) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Arc::new(backoff),
        }
    }

    /// Retries without waiting. Meant for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, ConstantBackoff::zero())
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(
            settings.max_attempts,
            ExponentialBackoff {
                initial_delay: Duration::from_millis(settings.initial_delay_ms),
                multiplier: settings.multiplier,
                max_delay: Duration::from_millis(settings.max_delay_ms),
            },
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay_for_attempt(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, ExponentialBackoff::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
    }

    #[test]
    fn test_exponential_backoff_doubles() {
        let backoff = ExponentialBackoff::default();

        assert_eq!(backoff.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(backoff.delay_for_attempt(4), Duration::from_secs(8));
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let backoff = ExponentialBackoff {
            max_delay: Duration::from_secs(3),
            ..ExponentialBackoff::default()
        };

        assert_eq!(backoff.delay_for_attempt(4), Duration::from_secs(3));
        assert_eq!(backoff.delay_for_attempt(500), Duration::from_secs(3));
    }

    #[test]
    fn test_uncapped_backoff_saturates_instead_of_panicking() {
        let backoff = ExponentialBackoff {
            max_delay: Duration::MAX,
            ..ExponentialBackoff::default()
        };

        assert_eq!(backoff.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(backoff.delay_for_attempt(100), Duration::MAX);
        assert_eq!(backoff.delay_for_attempt(u32::MAX), Duration::MAX);
    }

    #[test]
    fn test_zero_initial_delay_never_waits() {
        let backoff = ExponentialBackoff {
            initial_delay: Duration::ZERO,
            multiplier: 10.0,
            max_delay: Duration::MAX,
        };

        assert_eq!(backoff.delay_for_attempt(1), Duration::ZERO);
        assert_eq!(backoff.delay_for_attempt(1000), Duration::ZERO);
    }

    #[test]
    fn test_immediate_policy_never_waits() {
        let policy = RetryPolicy::immediate(5);
        for attempt in 1..=5 {
            assert_eq!(policy.delay_for_attempt(attempt), Duration::ZERO);
        }
    }

    #[test]
    fn test_max_attempts_is_at_least_one() {
        assert_eq!(RetryPolicy::immediate(0).max_attempts(), 1);
    }

    #[test]
    fn test_policy_from_settings() {
        let settings = RetrySettings {
            max_attempts: 3,
            initial_delay_ms: 250,
            multiplier: 3.0,
            max_delay_ms: 1000,
        };

        let policy = RetryPolicy::from_settings(&settings);

        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(750));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(1000));
    }
}
