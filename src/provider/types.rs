//! Balance values, credentials and error definitions.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::loader::ConfigError;
use crate::config::validation::is_path_safe;
use crate::provider::currency;

// Re-export from config module to avoid duplication
pub use crate::config::schema::Environment;

/// Environment variable holding the provider access token.
pub const ACCESS_TOKEN_ENV_VAR: &str = "PERSONAL_ACCESS_TOKEN";

/// Environment variable holding the account to query.
pub const ACCOUNT_ID_ENV_VAR: &str = "BANK_ACCOUNT_ID";

/// Where a reading handed to a caller came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    /// Fetched from the provider for this request.
    Live,
    /// Served from the balance cache.
    Cached,
}

/// A single observation of the account balance.
///
/// Readings are immutable; [`BalanceReading::with_source`] produces a
/// re-tagged copy. The sign of the amount is exactly what the provider
/// reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReading {
    amount: Decimal,
    currency: String,
    minor_units: i64,
    fetched_at: DateTime<Utc>,
    source: Source,
}

impl BalanceReading {
    /// Build a reading from an integer amount in the currency's minor unit.
    pub fn from_minor_units(
        minor_units: i64,
        currency: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, FetchError> {
        if !currency::is_valid_code(currency) {
            return Err(FetchError::MalformedResponse);
        }
        let amount = Decimal::new(minor_units, currency::exponent(currency));
        Ok(Self {
            amount,
            currency: currency.to_string(),
            minor_units,
            fetched_at,
            source: Source::Live,
        })
    }

    /// Build a reading from a major-unit decimal amount.
    pub fn from_amount(
        amount: Decimal,
        currency: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, FetchError> {
        if !currency::is_valid_code(currency) {
            return Err(FetchError::MalformedResponse);
        }
        let scale = Decimal::from(10i64.pow(currency::exponent(currency)));
        let minor_units = amount
            .checked_mul(scale)
            .and_then(|scaled| scaled.round().to_i64())
            .ok_or(FetchError::MalformedResponse)?;
        Ok(Self {
            amount,
            currency: currency.to_string(),
            minor_units,
            fetched_at,
            source: Source::Live,
        })
    }

    /// Copy of this reading tagged with `source`.
    pub fn with_source(self, source: Source) -> Self {
        Self { source, ..self }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn minor_units(&self) -> i64 {
        self.minor_units
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Human-readable amount, e.g. `£1,234.56`.
    pub fn display(&self) -> String {
        currency::format_amount(self.amount, &self.currency)
    }
}

/// Errors that can occur while fetching a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The provider did not answer within the deadline.
    #[error("provider request timed out")]
    Timeout,

    /// The provider rejected the configured credentials.
    #[error("provider rejected the credentials")]
    Unauthorized,

    /// The provider could not be reached or reported a server-side failure.
    #[error("provider unavailable")]
    ProviderUnavailable,

    /// The provider answered with a body we cannot interpret.
    #[error("provider returned a malformed response")]
    MalformedResponse,
}

impl FetchError {
    /// Stable identifier used in API payloads and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout => "Timeout",
            FetchError::Unauthorized => "Unauthorized",
            FetchError::ProviderUnavailable => "ProviderUnavailable",
            FetchError::MalformedResponse => "MalformedResponse",
        }
    }

    /// Transient failures may be masked by a stale cached value.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout | FetchError::ProviderUnavailable)
    }
}

/// Result type for provider operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Credentials and addressing for the provider API.
///
/// # Security
/// The access token is never logged; `Debug` redacts it.
#[derive(Clone)]
pub struct ProviderCredentials {
    access_token: String,
    account_id: String,
    environment: Environment,
    balance_url: Url,
}

impl ProviderCredentials {
    /// Create credentials, resolving the balance endpoint under `base_url`.
    pub fn new(
        access_token: impl Into<String>,
        account_id: impl Into<String>,
        environment: Environment,
        base_url: &str,
    ) -> Result<Self, ConfigError> {
        let access_token = access_token.into();
        let account_id = account_id.into();

        if access_token.trim().is_empty() {
            return Err(ConfigError::Credentials("access token is empty".into()));
        }
        if account_id.is_empty() || !is_path_safe(&account_id) {
            return Err(ConfigError::Credentials(format!(
                "invalid account id '{}'",
                account_id
            )));
        }

        let endpoint = format!(
            "{}/api/v2/accounts/{}/balance",
            base_url.trim_end_matches('/'),
            account_id
        );
        let balance_url = Url::parse(&endpoint).map_err(|e| {
            ConfigError::Credentials(format!("invalid base URL '{}': {}", base_url, e))
        })?;

        Ok(Self {
            access_token,
            account_id,
            environment,
            balance_url,
        })
    }

    /// Load credentials from the process environment.
    ///
    /// `BANK_ACCOUNT_ID` overrides `provider.account_id` from the config file.
    pub fn from_env(config: &crate::config::ProviderConfig) -> Result<Self, ConfigError> {
        Self::from_lookup(config, |key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(
        config: &crate::config::ProviderConfig,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup(ACCESS_TOKEN_ENV_VAR)
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(ACCESS_TOKEN_ENV_VAR))?;

        let account_id = lookup(ACCOUNT_ID_ENV_VAR)
            .filter(|id| !id.is_empty())
            .or_else(|| Some(config.account_id.clone()).filter(|id| !id.is_empty()))
            .ok_or(ConfigError::MissingEnv(ACCOUNT_ID_ENV_VAR))?;

        let credentials =
            Self::new(access_token, account_id, config.environment, config.base_url())?;

        tracing::info!(
            environment = ?credentials.environment,
            account_id = %credentials.account_id,
            "Provider credentials loaded"
        );

        Ok(credentials)
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Fully resolved balance endpoint.
    pub fn balance_url(&self) -> &Url {
        &self.balance_url
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("access_token", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("environment", &self.environment)
            .field("balance_url", &self.balance_url.as_str())
            .finish()
    }
}
