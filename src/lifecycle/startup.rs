//! Startup orchestration.
//!
//! # Responsibilities
//! - Load credentials from the environment
//! - Build the provider client and balance service
//! - Bind the listener last, once everything else is ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{BalanceConfig, ConfigError};
use crate::provider::{HttpBalanceProvider, ProviderCredentials};
use crate::service::BalanceService;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build provider client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
}

/// Build the balance service with credentials taken from the environment.
pub fn build_service(config: &BalanceConfig) -> Result<BalanceService, StartupError> {
    let credentials = ProviderCredentials::from_env(&config.provider)?;
    build_service_with(config, credentials)
}

/// Build the balance service with explicit credentials.
pub fn build_service_with(
    config: &BalanceConfig,
    credentials: ProviderCredentials,
) -> Result<BalanceService, StartupError> {
    let provider = HttpBalanceProvider::new(&config.provider)?;

    tracing::info!(
        environment = ?credentials.environment(),
        endpoint = %credentials.balance_url(),
        cache_ttl_secs = ?config.cache.enabled.then_some(config.cache.ttl_secs),
        request_timeout_secs = config.provider.request_timeout_secs,
        "Balance service configured"
    );

    Ok(BalanceService::new(
        Arc::new(provider),
        Arc::new(credentials),
        config,
    ))
}

/// Bind the configured listener address.
pub async fn bind(config: &BalanceConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address.clone();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}
