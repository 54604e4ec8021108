use std::{sync::Arc, time::Duration};

use log::info;
use tokio::time::timeout;

use crate::{
    config::ServerConfig, error::QuoteError, provider::RateProvider, store::ObservationStore,
};

/// Fetch-then-persist pipeline behind `GET /cotacao`.
///
/// Each step gets its own deadline on top of whatever bounds the caller's
/// future, so whichever expires first aborts the request. The fetch is cut
/// off here; the persist budget is handed to the store, which must give up
/// without writing once it is spent. Nothing is retried and a failed persist
/// throws the fetched quote away.
pub struct QuoteService {
    provider: Arc<dyn RateProvider>,
    store: Arc<dyn ObservationStore>,
    fetch_timeout: Duration,
    persist_timeout: Duration,
}

impl QuoteService {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        store: Arc<dyn ObservationStore>,
        fetch_timeout: Duration,
        persist_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            store,
            fetch_timeout,
            persist_timeout,
        }
    }

    pub fn from_config(
        config: &ServerConfig,
        provider: Arc<dyn RateProvider>,
        store: Arc<dyn ObservationStore>,
    ) -> Self {
        Self::new(provider, store, config.fetch_timeout, config.persist_timeout)
    }

    /// Fetches a fresh quote, stores it, and hands back its bid.
    pub async fn latest_bid(&self) -> Result<String, QuoteError> {
        let rate = timeout(self.fetch_timeout, self.provider.fetch_rate())
            .await
            .map_err(|_| QuoteError::ProviderTimeout(self.fetch_timeout))??;

        self.store.save(&rate, self.persist_timeout).await?;

        info!("Recorded {}/{} bid {}", rate.code, rate.codein, rate.bid);
        Ok(rate.bid)
    }
}
