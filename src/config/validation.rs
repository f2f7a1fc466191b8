//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the provider base URL is a usable http(s) URL
//! - Check the inbound deadline leaves room for a full fetch with its retry
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalanceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::config::schema::BalanceConfig;
use crate::resilience::retries::{RetryPolicy, MAX_ATTEMPTS};

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &BalanceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    match url::Url::parse(config.provider.base_url()) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "provider.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("provider.base_url", e.to_string())),
    }

    if !is_path_safe(&config.provider.account_id) {
        errors.push(ValidationError::new(
            "provider.account_id",
            "must not contain '/', '?', '#' or whitespace",
        ));
    }

    if config.provider.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "provider.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.cache.enabled && config.cache.ttl_secs == 0 {
        errors.push(ValidationError::new(
            "cache.ttl_secs",
            "must be greater than zero when the cache is enabled",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than zero",
        ));
    }

    let budget = worst_case_fetch(config);
    if config.timeouts.request_secs > 0 && Duration::from_secs(config.timeouts.request_secs) <= budget {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!("must exceed the worst-case provider fetch ({}ms)", budget.as_millis()),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Longest a single fetch can take: every attempt hits the provider deadline,
/// with the retry pause between them.
pub(crate) fn worst_case_fetch(config: &BalanceConfig) -> Duration {
    let deadline = Duration::from_secs(config.provider.request_timeout_secs);
    if config.retries.enabled {
        let policy = RetryPolicy::new(&config.retries);
        deadline * MAX_ATTEMPTS + policy.max_delay()
    } else {
        deadline
    }
}

/// Account ids are spliced into the request path.
pub(crate) fn is_path_safe(segment: &str) -> bool {
    !segment
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
}
