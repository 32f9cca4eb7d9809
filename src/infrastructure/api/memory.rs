//! Fixed, in-memory market data. Useful for replaying a captured registry
//! snapshot and for tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::MarketData;
use crate::domain::pool::{DexDescriptor, DexRegistry, TokenEntry, TokenRegistry};
use crate::domain::supply::DexStorage;
use crate::shared::errors::SwapError;

#[derive(Debug, Default)]
pub struct InMemoryMarket {
    tokens: TokenRegistry,
    pools: BTreeMap<String, DexDescriptor>,
    storage: HashMap<String, DexStorage>,
    fetches: AtomicUsize,
}

impl InMemoryMarket {
    pub fn with_token(mut self, entry: TokenEntry) -> Self {
        self.tokens.insert(entry.symbol.clone(), entry);
        self
    }

    pub fn with_pool(mut self, dex: DexDescriptor) -> Self {
        self.pools.insert(dex.address.clone(), dex);
        self
    }

    pub fn with_storage(mut self, address: &str, storage: DexStorage) -> Self {
        self.storage.insert(address.to_string(), storage);
        self
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MarketData for InMemoryMarket {
    async fn fetch_tokens(&self) -> Result<TokenRegistry, SwapError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.tokens.clone())
    }

    async fn fetch_dex_pools(&self) -> Result<DexRegistry, SwapError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(DexRegistry::new(self.pools.clone()))
    }

    async fn fetch_storage(&self, address: &str) -> Result<DexStorage, SwapError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.storage.get(address).cloned().ok_or_else(|| SwapError::Fetch {
            url: format!("memory://contracts/{}/storage", address),
            reason: "status 404 Not Found".to_string(),
        })
    }
}
