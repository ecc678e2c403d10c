//! Retry policy for upstream requests.
//!
//! Only connect errors and timeouts are retried. A non-success status or a
//! malformed body is an answer, not a glitch, and goes straight to the
//! strategy.

use std::time::Duration;

/// Policy for retrying failed requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryStrategy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Whether each retry doubles the delay.
    pub exponential_backoff: bool,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl RetryStrategy {
    /// Creates a policy with `max_attempts` total attempts.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(500),
            exponential_backoff: true,
            max_delay: Duration::from_secs(8),
        }
    }

    /// Creates a policy allowing `retries` retries after the first attempt.
    pub fn with_retries(retries: u32) -> Self {
        Self::new(retries.saturating_add(1))
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            exponential_backoff: false,
            max_delay: Duration::ZERO,
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Enables or disables exponential backoff.
    pub fn with_exponential_backoff(mut self, enabled: bool) -> Self {
        self.exponential_backoff = enabled;
        self
    }

    /// Calculates the delay after a failed attempt (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = if self.exponential_backoff {
            let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
            self.base_delay.saturating_mul(factor)
        } else {
            self.base_delay
        };

        delay.min(self.max_delay)
    }

    /// Determines if a request error should be retried.
    pub fn should_retry(&self, error: &reqwest::Error) -> bool {
        error.is_connect() || error.is_timeout()
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::with_retries(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff() {
        let strategy = RetryStrategy::default();

        assert_eq!(strategy.max_attempts, 3);
        assert_eq!(strategy.delay_for_attempt(1), Duration::from_millis(500));
        assert_eq!(strategy.delay_for_attempt(2), Duration::from_secs(1));
        assert_eq!(strategy.delay_for_attempt(3), Duration::from_secs(2));
    }

    #[test]
    fn test_max_delay_cap() {
        let strategy = RetryStrategy::new(10).with_base_delay(Duration::from_secs(3));
        assert_eq!(strategy.delay_for_attempt(5), Duration::from_secs(8));
    }

    #[test]
    fn test_attempts_never_zero() {
        assert_eq!(RetryStrategy::new(0).max_attempts, 1);
        assert_eq!(RetryStrategy::with_retries(0).max_attempts, 1);
        assert_eq!(RetryStrategy::no_retry().delay_for_attempt(1), Duration::ZERO);
    }
}
