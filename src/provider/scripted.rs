//! Scripted provider for exercising the service without a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::provider::client::BalanceProvider;
use crate::provider::types::{BalanceReading, FetchError, FetchResult, ProviderCredentials};

/// Replays a fixed list of outcomes, then reports the provider as unavailable.
pub struct ScriptedProvider {
    outcomes: Mutex<VecDeque<FetchResult<BalanceReading>>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedProvider {
    pub fn new(outcomes: Vec<FetchResult<BalanceReading>>) -> Arc<Self> {
        Self::with_delay(outcomes, Duration::ZERO)
    }

    pub fn with_delay(outcomes: Vec<FetchResult<BalanceReading>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
            delay,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceProvider for ScriptedProvider {
    async fn fetch_balance(&self, _credentials: &ProviderCredentials) -> FetchResult<BalanceReading> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FetchError::ProviderUnavailable))
    }
}
