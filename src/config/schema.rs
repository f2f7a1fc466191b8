//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.
//! Secrets are deliberately absent: the access token only ever comes from
//! the process environment (see [`crate::provider::ProviderCredentials`]).

use serde::{Deserialize, Serialize};

/// Root configuration for the balance service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BalanceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream provider settings.
    pub provider: ProviderConfig,

    /// Balance cache settings.
    pub cache: CacheConfig,

    /// Retry configuration for provider calls.
    pub retries: RetryConfig,

    /// Inbound request timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Which provider deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    /// Base URL of the provider API for this environment.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Environment::Sandbox => "https://api-sandbox.starlingbank.com",
            Environment::Production => "https://api.starlingbank.com",
        }
    }
}

/// Which of the provider's balance figures is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum BalanceField {
    /// Settled funds only.
    #[default]
    ClearedBalance,
    /// Settled funds adjusted by pending transactions.
    EffectiveBalance,
}

/// Provider (upstream banking API) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Sandbox or production deployment.
    pub environment: Environment,

    /// Overrides the environment's base URL (useful for local mocks).
    pub base_url: Option<String>,

    /// Account to query. `BANK_ACCOUNT_ID` takes precedence when set.
    pub account_id: String,

    /// Balance figure extracted from the provider response.
    pub balance_field: BalanceField,

    /// Outbound request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ProviderConfig {
    /// Effective base URL after applying the override.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.default_base_url())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Sandbox,
            base_url: None,
            account_id: String::new(),
            balance_field: BalanceField::ClearedBalance,
            request_timeout_secs: 5,
        }
    }
}

/// Balance cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Serve repeated requests from memory and keep a stale fallback.
    pub enabled: bool,

    /// Freshness window in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 30,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time to answer a client) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retry a timed-out provider call once.
    pub enabled: bool,

    /// Pause before the retry in milliseconds (up to 10% jitter is added).
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 100,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address of the metrics listener.
    pub metrics_address: String,

    /// Emit logs as JSON lines instead of the pretty format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
            json_logs: false,
        }
    }
}
