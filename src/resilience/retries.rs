//! Retry logic.
//!
//! # Responsibilities
//! - Determine if a failed fetch is retryable
//! - Bound the number of attempts per request
//! - Compute the delay before the next attempt
//!
//! # Design Decisions
//! - Only timeouts are retried; auth, contract and availability failures are not
//! - At most one retry, so worst-case latency stays at two provider deadlines
//! - One short jittered pause before the retry

use std::time::Duration;

use crate::config::RetryConfig;
use crate::provider::types::FetchError;
use crate::resilience::backoff::retry_delay;

/// Total provider calls allowed per fetch (the first try plus one retry).
pub const MAX_ATTEMPTS: u32 = 2;

/// Whether an error kind is worth another attempt.
pub fn is_retryable(err: &FetchError) -> bool {
    matches!(err, FetchError::Timeout)
}

/// Retry policy derived from [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    enabled: bool,
    delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            enabled: config.enabled,
            delay_ms: config.delay_ms,
        }
    }

    /// Policy that never retries.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            delay_ms: 0,
        }
    }

    /// Decide whether attempt number `attempt` (1-based) should be followed by another.
    pub fn should_retry(&self, err: &FetchError, attempt: u32) -> bool {
        self.enabled && attempt < MAX_ATTEMPTS && is_retryable(err)
    }

    /// Pause before the retry.
    pub fn delay(&self) -> Duration {
        retry_delay(self.delay_ms)
    }

    /// Longest pause [`delay`](Self::delay) can return.
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms + self.delay_ms / 10)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}
