//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap provider calls with a deadline
//! - Cancel the outbound request cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - A timed-out fetch is reported as [`FetchError::Timeout`]

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::provider::types::{FetchError, FetchResult};

/// Run `fut`, mapping an elapsed deadline to [`FetchError::Timeout`].
pub async fn with_timeout<F, T>(duration: Duration, fut: F) -> FetchResult<T>
where
    F: Future<Output = FetchResult<T>>,
{
    match timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout = ?duration, "Provider call exceeded deadline");
            Err(FetchError::Timeout)
        }
    }
}
