pub mod data_fetcher;
pub mod memory;
pub mod plenty_api;

pub use data_fetcher::DataFetcher;
pub use memory::InMemoryMarket;
pub use plenty_api::PlentyApi;

use async_trait::async_trait;

use crate::domain::pool::{DexRegistry, TokenRegistry};
use crate::domain::supply::DexStorage;
use crate::shared::errors::SwapError;

/// Source of registry and on-chain pool data
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Token registry (symbol -> token entry)
    async fn fetch_tokens(&self) -> Result<TokenRegistry, SwapError>;

    /// DEX registry (pool id -> DEX descriptor)
    async fn fetch_dex_pools(&self) -> Result<DexRegistry, SwapError>;

    /// Current storage of a DEX contract
    async fn fetch_storage(&self, address: &str) -> Result<DexStorage, SwapError>;
}
