//! Response rendering.
//!
//! # Responsibilities
//! - Serialize successful readings
//! - Map fetch errors to HTTP status codes and a fixed error payload
//!
//! # Design Decisions
//! - Error bodies carry only the error kind; provider text is never forwarded
//! - Transient failures are 503, contract violations 502, credential problems 401
//! - Amounts are written as JSON number literals from the decimal text, never via `f64`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{ser::Error as _, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::provider::types::{BalanceReading, FetchError, Source};

/// JSON body of a successful balance response.
#[derive(Debug, Serialize)]
pub struct BalanceBody {
    #[serde(serialize_with = "exact_number")]
    pub amount: Decimal,
    pub currency: String,
    pub source: Source,
    pub fetched_at: DateTime<Utc>,
    pub minor_units: i64,
    pub display: String,
}

impl From<&BalanceReading> for BalanceBody {
    fn from(reading: &BalanceReading) -> Self {
        Self {
            amount: reading.amount(),
            currency: reading.currency().to_string(),
            source: reading.source(),
            fetched_at: reading.fetched_at(),
            minor_units: reading.minor_units(),
            display: reading.display(),
        }
    }
}

fn exact_number<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    // Decimal's Display never uses exponent notation, so this is a valid JSON number
    let literal = RawValue::from_string(amount.to_string()).map_err(S::Error::custom)?;
    literal.serialize(serializer)
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

/// HTTP status for a fetch failure that could not be absorbed.
pub fn status_for(err: &FetchError) -> StatusCode {
    match err {
        FetchError::Timeout | FetchError::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        FetchError::Unauthorized => StatusCode::UNAUTHORIZED,
        FetchError::MalformedResponse => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        (status_for(&self), Json(ErrorBody { error: self.kind() })).into_response()
    }
}
