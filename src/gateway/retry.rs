//! Retry policy for gateway operations

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// How many times an operation is attempted and how long to wait in between
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// `None` retries until the operation succeeds
    pub max_attempts: Option<u32>,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
    pub jitter: bool,
}

impl RetryPolicy {
    /// Retry forever without waiting
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            multiplier: 1.0,
            jitter: false,
        }
    }

    /// Up to `attempts` tries without waiting
    pub fn immediate(attempts: u32) -> Self {
        Self {
            max_attempts: Some(attempts.max(1)),
            ..Self::unbounded()
        }
    }

    /// Whether another attempt may follow attempt number `attempt` (1-based)
    pub fn allows_another(&self, attempt: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }

    /// Delay after failed attempt number `attempt` (1-based), before jitter
    pub fn base_delay(&self, attempt: u32) -> Duration {
        if self.initial_backoff.is_zero() {
            return Duration::ZERO;
        }

        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let scaled = self.initial_backoff.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = scaled.min(self.max_backoff.as_millis() as f64);

        Duration::from_millis(capped.round() as u64)
    }

    /// Delay after failed attempt number `attempt`, jittered by up to +/-25%
    pub fn delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        if !self.jitter || base.is_zero() {
            return base;
        }

        let factor = rand::thread_rng().gen_range(0.75..=1.25);
        base.mul_f64(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: (config.max_attempts > 0).then_some(config.max_attempts),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            multiplier: config.multiplier,
            jitter: config.jitter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: Some(4),
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(500),
            multiplier: 2.0,
            jitter: false,
        }
    }

    #[test]
    fn test_exponential_delay_is_capped() {
        let p = policy();
        assert_eq!(p.base_delay(1), Duration::from_millis(100));
        assert_eq!(p.base_delay(2), Duration::from_millis(200));
        assert_eq!(p.base_delay(3), Duration::from_millis(400));
        assert_eq!(p.base_delay(4), Duration::from_millis(500));
        assert_eq!(p.base_delay(40), Duration::from_millis(500));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let p = RetryPolicy {
            jitter: true,
            ..policy()
        };
        for _ in 0..100 {
            let d = p.delay(2);
            assert!(d >= Duration::from_millis(150) && d <= Duration::from_millis(250));
        }
    }

    #[test]
    fn test_attempt_limits() {
        let p = policy();
        assert!(p.allows_another(3));
        assert!(!p.allows_another(4));

        let forever = RetryPolicy::unbounded();
        assert!(forever.allows_another(u32::MAX - 1));
        assert_eq!(forever.delay(7), Duration::ZERO);

        assert_eq!(RetryPolicy::immediate(0).max_attempts, Some(1));
    }

    #[test]
    fn test_from_config() {
        let config = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        assert_eq!(RetryPolicy::from(&config).max_attempts, None);

        let p = RetryPolicy::default();
        assert_eq!(p.max_attempts, Some(5));
        assert_eq!(p.initial_backoff, Duration::from_millis(250));
    }
}
