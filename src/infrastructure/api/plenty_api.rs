use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::{DataFetcher, MarketData};
use crate::config::EndpointsCfg;
use crate::domain::pool::{DexRegistry, TokenRegistry};
use crate::domain::supply::DexStorage;
use crate::shared::errors::SwapError;

/// Plenty config service + TzKT indexer client
pub struct PlentyApi {
    fetcher: DataFetcher,
    endpoints: EndpointsCfg,
}

impl PlentyApi {
    pub fn new(endpoints: EndpointsCfg, timeout: Duration) -> Result<Self, SwapError> {
        Ok(Self {
            fetcher: DataFetcher::new(timeout)?,
            endpoints,
        })
    }

    /// Mainnet endpoints
    pub fn mainnet(timeout: Duration) -> Result<Self, SwapError> {
        Self::new(EndpointsCfg::default(), timeout)
    }

    pub fn storage_url(&self, address: &str) -> String {
        format!("{}/contracts/{}/storage", self.endpoints.tzkt_url.trim_end_matches('/'), address)
    }
}

#[async_trait]
impl MarketData for PlentyApi {
    async fn fetch_tokens(&self) -> Result<TokenRegistry, SwapError> {
        let tokens: TokenRegistry = self.fetcher.get_json(&self.endpoints.tokens_url).await?;
        info!("fetched {} tokens from {}", tokens.len(), self.endpoints.tokens_url);
        Ok(tokens)
    }

    async fn fetch_dex_pools(&self) -> Result<DexRegistry, SwapError> {
        let pools: DexRegistry = self.fetcher.get_json(&self.endpoints.pools_url).await?;
        info!("fetched {} pools from {}", pools.len(), self.endpoints.pools_url);
        Ok(pools)
    }

    async fn fetch_storage(&self, address: &str) -> Result<DexStorage, SwapError> {
        self.fetcher.get_json(&self.storage_url(address)).await
    }
}
