//! Plenty Swap - token swaps on Plenty Network (Tezos)
//!
//! Token/pool registry lookup, DEX reserve and price reads, slippage-bounded
//! minimum-out computation and a batched `approve` + `Swap` through a wallet
//! toolkit.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod math;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use application::{quote_token_in, swap_token_in, try_swap_token_in, SwapQuote, SwapService};
pub use domain::execution::{swap_tokens, ContractHandle, SwapExecution, SwapRequest, Toolkit};
pub use domain::pool::{find_dex, get_pools, pairs_of, DexDescriptor, DexRegistry, TokenEntry, TokenRegistry};
pub use domain::supply::{get_supply, Supply};
pub use infrastructure::api::{InMemoryMarket, MarketData, PlentyApi};
pub use report::SwapReport;
pub use shared::errors::{EstimationCauses, SwapError, ToolkitError};
pub use shared::types::SwapContext;
