//! Retry policy for model calls.

use std::time::Duration;

use riskcast_config::RetryConfig;

/// Delay between a failed attempt and the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `step * n` after the n-th failed attempt
    Linear { step: Duration },
    Fixed(Duration),
    None,
}

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Backoff::Linear {
                step: Duration::from_millis(500),
            },
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Backoff) -> Self {
        Self { max_retries, backoff }
    }

    /// A single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(0, Backoff::None)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Wait after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Linear { step } => step * attempt,
            Backoff::Fixed(delay) => delay,
            Backoff::None => Duration::ZERO,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Backoff::Linear {
                step: Duration::from_millis(config.backoff_ms),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_linear_half_second() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
    }

    #[test]
    fn fixed_and_none() {
        let fixed = RetryPolicy::new(3, Backoff::Fixed(Duration::from_secs(2)));
        assert_eq!(fixed.delay_for(1), fixed.delay_for(3));
        assert_eq!(RetryPolicy::none().delay_for(5), Duration::ZERO);
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }

    #[test]
    fn built_from_config() {
        let config = RetryConfig {
            max_retries: 4,
            backoff_ms: 250,
        };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.delay_for(2), Duration::from_millis(500));
    }
}
