//! Fetch orchestration: cache, provider, retry and stale fallback.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::BalanceCache;
use crate::config::BalanceConfig;
use crate::observability::metrics;
use crate::provider::client::BalanceProvider;
use crate::provider::types::{BalanceReading, FetchError, FetchResult, ProviderCredentials, Source};
use crate::resilience::RetryPolicy;

/// Produces balance readings for the HTTP layer.
///
/// Cloning is cheap; all clones share one cache slot.
#[derive(Clone)]
pub struct BalanceService {
    provider: Arc<dyn BalanceProvider>,
    credentials: Arc<ProviderCredentials>,
    cache: Arc<BalanceCache>,
    cache_ttl: Option<Duration>,
    retry: RetryPolicy,
}

impl BalanceService {
    /// Wire a service from validated configuration.
    pub fn new(
        provider: Arc<dyn BalanceProvider>,
        credentials: Arc<ProviderCredentials>,
        config: &BalanceConfig,
    ) -> Self {
        let cache_ttl = config
            .cache
            .enabled
            .then(|| Duration::from_secs(config.cache.ttl_secs));

        Self {
            provider,
            credentials,
            cache: Arc::new(BalanceCache::new()),
            cache_ttl,
            retry: RetryPolicy::new(&config.retries),
        }
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the cache TTL; `None` disables caching.
    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// The shared cache slot.
    pub fn cache(&self) -> &BalanceCache {
        &self.cache
    }

    /// Current balance, from cache when fresh, otherwise from the provider.
    pub async fn get_balance(&self) -> FetchResult<BalanceReading> {
        if self.cache_ttl.is_some() {
            if let Some(reading) = self.cache.get() {
                tracing::debug!("Serving balance from cache");
                return Ok(reading.with_source(Source::Cached));
            }
        }

        // Detached so a disconnected caller does not cancel the fetch
        let this = self.clone();
        let outcome = match tokio::spawn(async move { this.fetch_and_store().await }).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Balance fetch task failed");
                Err(FetchError::ProviderUnavailable)
            }
        };

        match outcome {
            Ok(reading) => Ok(reading),
            Err(err) if err.is_transient() => match self.stale_fallback() {
                Some(reading) => {
                    tracing::warn!(
                        error = err.kind(),
                        fetched_at = %reading.fetched_at(),
                        "Provider failed, serving stale balance"
                    );
                    Ok(reading)
                }
                None => Err(err),
            },
            Err(err) => {
                tracing::error!(error = err.kind(), "Balance fetch failed");
                Err(err)
            }
        }
    }

    fn stale_fallback(&self) -> Option<BalanceReading> {
        self.cache_ttl?;
        self.cache
            .get_stale()
            .map(|reading| reading.with_source(Source::Cached))
    }

    async fn fetch_and_store(&self) -> FetchResult<BalanceReading> {
        let reading = self.fetch_with_retry().await?.with_source(Source::Live);
        if let Some(ttl) = self.cache_ttl {
            self.cache.put(reading.clone(), ttl);
        }
        Ok(reading)
    }

    async fn fetch_with_retry(&self) -> FetchResult<BalanceReading> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = self.provider.fetch_balance(&self.credentials).await;
            match &result {
                Ok(_) => metrics::record_fetch("ok"),
                Err(err) => metrics::record_fetch(err.kind()),
            }

            match result {
                Err(err) if self.retry.should_retry(&err, attempt) => {
                    let delay = self.retry.delay();
                    tracing::info!(attempt, delay = ?delay, error = err.kind(), "Retrying provider fetch");
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}

impl std::fmt::Debug for BalanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceService")
            .field("credentials", &self.credentials)
            .field("cache_ttl", &self.cache_ttl)
            .field("retry", &self.retry)
            .finish()
    }
}
