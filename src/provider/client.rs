//! Provider HTTP client with timeout and error translation.
//!
//! # Responsibilities
//! - Issue one authenticated balance request per fetch
//! - Translate HTTP status and transport failures into [`FetchError`]
//! - Parse the response body into a [`BalanceReading`]

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::{BalanceField, ProviderConfig};
use crate::provider::types::{BalanceReading, FetchError, FetchResult, ProviderCredentials};
use crate::resilience::timeouts::with_timeout;

/// Source of balance readings.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// Fetch the current balance. Every failure is a [`FetchError`].
    async fn fetch_balance(&self, credentials: &ProviderCredentials) -> FetchResult<BalanceReading>;
}

/// [`BalanceProvider`] backed by the provider's REST API.
#[derive(Clone)]
pub struct HttpBalanceProvider {
    client: reqwest::Client,
    balance_field: BalanceField,
    timeout_duration: Duration,
}

impl HttpBalanceProvider {
    /// Create a client from the provider section of the config.
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let timeout_duration = Duration::from_secs(config.request_timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(timeout_duration)
            .user_agent(concat!("quick-balance/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            balance_field: config.balance_field,
            timeout_duration,
        })
    }

    async fn request(&self, credentials: &ProviderCredentials) -> FetchResult<BalanceReading> {
        let response = self
            .client
            .get(credentials.balance_url().clone())
            .bearer_auth(credentials.access_token())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let err = classify_status(status);
            tracing::warn!(status = %status, error = err.kind(), "Provider returned an error status");
            return Err(err);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        parse_balance(&body, self.balance_field, Utc::now())
    }
}

#[async_trait]
impl BalanceProvider for HttpBalanceProvider {
    async fn fetch_balance(&self, credentials: &ProviderCredentials) -> FetchResult<BalanceReading> {
        with_timeout(self.timeout_duration, self.request(credentials)).await
    }
}

impl std::fmt::Debug for HttpBalanceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBalanceProvider")
            .field("balance_field", &self.balance_field)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

/// Map a non-success status to a domain error.
pub fn classify_status(status: StatusCode) -> FetchError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Unauthorized,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => FetchError::Timeout,
        _ => FetchError::ProviderUnavailable,
    }
}

fn classify_transport_error(err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        tracing::warn!("Provider request timed out");
        FetchError::Timeout
    } else if err.is_decode() {
        tracing::warn!(error = %err, "Provider body could not be decoded");
        FetchError::MalformedResponse
    } else {
        tracing::warn!(error = %err, "Provider transport error");
        FetchError::ProviderUnavailable
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BalanceBody {
    Flat(FlatBalance),
    Account(AccountBalances),
}

#[derive(Debug, Deserialize)]
struct FlatBalance {
    amount: Decimal,
    currency: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountBalances {
    cleared_balance: Option<CurrencyAndAmount>,
    effective_balance: Option<CurrencyAndAmount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrencyAndAmount {
    currency: String,
    minor_units: i64,
}

/// Parse a provider response body.
///
/// Accepts the account balance document (`clearedBalance` /
/// `effectiveBalance` in minor units) and a flat `{amount, currency}` shape.
pub fn parse_balance(
    body: &[u8],
    field: BalanceField,
    fetched_at: DateTime<Utc>,
) -> FetchResult<BalanceReading> {
    let parsed: BalanceBody = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Unparseable provider balance body");
        FetchError::MalformedResponse
    })?;

    match parsed {
        BalanceBody::Flat(flat) => BalanceReading::from_amount(flat.amount, &flat.currency, fetched_at),
        BalanceBody::Account(balances) => {
            let selected = match field {
                BalanceField::ClearedBalance => balances.cleared_balance,
                BalanceField::EffectiveBalance => balances.effective_balance,
            };
            let value = selected.ok_or_else(|| {
                tracing::warn!(field = ?field, "Provider balance body lacks the configured field");
                FetchError::MalformedResponse
            })?;
            BalanceReading::from_minor_units(value.minor_units, &value.currency, fetched_at)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::provider::types::Source;

    const ACCOUNT_BODY: &str = r#"{
        "clearedBalance": {"currency": "GBP", "minorUnits": 123456},
        "effectiveBalance": {"currency": "GBP", "minorUnits": 120000},
        "pendingTransactions": {"currency": "GBP", "minorUnits": 3456},
        "acceptedOverdraft": {"currency": "GBP", "minorUnits": 0},
        "amount": {"currency": "GBP", "minorUnits": 123456}
    }"#;

    #[test]
    fn test_parse_account_body_cleared() {
        let now = Utc::now();
        let reading = parse_balance(ACCOUNT_BODY.as_bytes(), BalanceField::ClearedBalance, now).unwrap();
        assert_eq!(reading.amount(), Decimal::new(123456, 2));
        assert_eq!(reading.currency(), "GBP");
        assert_eq!(reading.fetched_at(), now);
        assert_eq!(reading.source(), Source::Live);
    }

    #[test]
    fn test_parse_account_body_effective() {
        let reading =
            parse_balance(ACCOUNT_BODY.as_bytes(), BalanceField::EffectiveBalance, Utc::now()).unwrap();
        assert_eq!(reading.minor_units(), 120000);
    }

    #[test]
    fn test_parse_flat_body() {
        let reading = parse_balance(
            br#"{"amount": 1000, "currency": "USD"}"#,
            BalanceField::ClearedBalance,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(reading.amount(), Decimal::from(1000));
        assert_eq!(reading.currency(), "USD");
    }

    #[test]
    fn test_parse_overdrawn_balance() {
        let reading = parse_balance(
            br#"{"clearedBalance": {"currency": "GBP", "minorUnits": -5025}}"#,
            BalanceField::ClearedBalance,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(reading.amount(), Decimal::new(-5025, 2));
    }

    #[test]
    fn test_parse_malformed_bodies() {
        let cases: &[&[u8]] = &[
            b"not json",
            b"{}",
            br#"{"clearedBalance": {"currency": "GBP"}}"#,
            br#"{"amount": "lots", "currency": "USD"}"#,
            br#"{"amount": 10, "currency": "dollars"}"#,
        ];
        for body in cases {
            let err = parse_balance(body, BalanceField::ClearedBalance, Utc::now()).unwrap_err();
            assert_eq!(err, FetchError::MalformedResponse, "body: {:?}", String::from_utf8_lossy(body));
        }
    }

    #[test]
    fn test_missing_selected_field() {
        let err = parse_balance(
            br#"{"clearedBalance": {"currency": "GBP", "minorUnits": 1}}"#,
            BalanceField::EffectiveBalance,
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err, FetchError::MalformedResponse);
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::UNAUTHORIZED), FetchError::Unauthorized);
        assert_eq!(classify_status(StatusCode::FORBIDDEN), FetchError::Unauthorized);
        assert_eq!(classify_status(StatusCode::GATEWAY_TIMEOUT), FetchError::Timeout);
        assert_eq!(classify_status(StatusCode::SERVICE_UNAVAILABLE), FetchError::ProviderUnavailable);
        assert_eq!(classify_status(StatusCode::NOT_FOUND), FetchError::ProviderUnavailable);
        assert_eq!(classify_status(StatusCode::TOO_MANY_REQUESTS), FetchError::ProviderUnavailable);
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let config = ProviderConfig {
            request_timeout_secs: 2,
            ..ProviderConfig::default()
        };
        let provider = HttpBalanceProvider::new(&config).unwrap();
        let creds =
            ProviderCredentials::new("t", "acc", Environment::Sandbox, "http://127.0.0.1:9").unwrap();

        let err = provider.fetch_balance(&creds).await.unwrap_err();
        assert!(err.is_transient());
    }
}
