//! Retry policies for HTTP requests.

use crate::error::HttpError;
use std::time::Duration;

/// Retry policy for an HTTP request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt.
    #[default]
    None,
    /// Retry on transport failures + 502/503/504, with backoff on 429.
    /// Default for reads.
    Idempotent,
    /// User-provided retry logic.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// Resolve to a config, or `None` for a single attempt.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(c) => Some(c.clone()),
        }
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Whether to add jitter to the delay.
    pub jitter: bool,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// The default config for idempotent reads.
    pub fn idempotent() -> Self {
        Self {
            retryable_statuses: vec![429, 502, 503, 504],
            ..Self::default()
        }
    }

    /// Whether a failed attempt is worth repeating under this config.
    pub fn should_retry(&self, error: &HttpError) -> bool {
        match error {
            HttpError::ServerError { status, .. } => self.retryable_statuses.contains(status),
            HttpError::RateLimited { .. } => self.retryable_statuses.contains(&429),
            HttpError::Timeout => true,
            #[cfg(feature = "http")]
            HttpError::Reqwest(re) => {
                #[cfg(not(target_arch = "wasm32"))]
                let retryable = re.is_connect() || re.is_timeout() || re.is_request();
                #[cfg(target_arch = "wasm32")]
                let retryable = re.is_timeout() || re.is_request();
                retryable
            }
            _ => false,
        }
    }

    /// Delay before retrying `error` on the given attempt (0-indexed).
    ///
    /// A server-provided `Retry-After` wins over the backoff schedule, capped
    /// at `max_delay`.
    pub fn delay_after(&self, error: &HttpError, attempt: u32) -> Duration {
        match error {
            HttpError::RateLimited {
                retry_after_ms: Some(ms),
            } => Duration::from_millis(*ms).min(self.max_delay),
            _ => self.delay_for_attempt(attempt),
        }
    }

    /// Calculate delay for a given attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter() -> RetryConfig {
        RetryConfig {
            initial_delay: Duration::from_millis(100),
            jitter: false,
            ..RetryConfig::idempotent()
        }
    }

    #[test]
    fn test_retry_policy_default_is_single_attempt() {
        assert!(RetryPolicy::default().config().is_none());
        assert!(RetryPolicy::Idempotent.config().is_some());
    }

    #[test]
    fn test_idempotent_retries_rate_limit_and_gateway_errors() {
        let config = RetryConfig::idempotent();
        assert!(config.should_retry(&HttpError::RateLimited { retry_after_ms: None }));
        assert!(config.should_retry(&HttpError::ServerError {
            status: 503,
            body: String::new()
        }));
        assert!(!config.should_retry(&HttpError::ServerError {
            status: 500,
            body: String::new()
        }));
        assert!(!config.should_retry(&HttpError::NotFound("poll".to_string())));
        assert!(!config.should_retry(&HttpError::Unauthorized));
    }

    #[test]
    fn test_default_config_does_not_retry_rate_limit() {
        let config = RetryConfig::default();
        assert!(!config.should_retry(&HttpError::RateLimited { retry_after_ms: None }));
    }

    #[test]
    fn test_delay_schedule_doubles() {
        let config = no_jitter();
        assert_eq!(config.delay_for_attempt(0).as_millis(), 100);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 200);
        assert_eq!(config.delay_for_attempt(2).as_millis(), 400);
    }

    #[test]
    fn test_delay_caps_at_max() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(2000),
            backoff_factor: 10.0,
            ..no_jitter()
        };
        assert_eq!(config.delay_for_attempt(3).as_millis(), 2000);
    }

    #[test]
    fn test_retry_after_hint_overrides_backoff() {
        let config = no_jitter();
        let hinted = HttpError::RateLimited {
            retry_after_ms: Some(1500),
        };
        assert_eq!(config.delay_after(&hinted, 0).as_millis(), 1500);

        let huge = HttpError::RateLimited {
            retry_after_ms: Some(60_000),
        };
        assert_eq!(config.delay_after(&huge, 0), config.max_delay);

        let timeout = HttpError::Timeout;
        assert_eq!(config.delay_after(&timeout, 1).as_millis(), 200);
    }
}
