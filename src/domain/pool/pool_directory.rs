//! Token registry: the universe of tradable tokens and their contracts

use std::collections::BTreeMap;
use tracing::{debug, info};

use super::TokenEntry;
use crate::infrastructure::api::MarketData;
use crate::shared::errors::SwapError;
use crate::shared::types::SwapContext;
use crate::shared::utils::with_timeout;

/// Symbol -> token entry
pub type TokenRegistry = BTreeMap<String, TokenEntry>;

/// Fetch the token registry. Nothing is cached; every call hits the endpoint.
pub async fn get_pools(source: &dyn MarketData, ctx: &SwapContext) -> Result<TokenRegistry, SwapError> {
    let tokens = with_timeout("fetch tokens", ctx.timeout, source.fetch_tokens()).await?;
    if ctx.is_debug() {
        debug!(count = tokens.len(), "fetched token registry");
    }
    Ok(tokens)
}

/// Pairs tradable against `token`, or `None` when the token is unknown
pub fn pairs_of<'a>(pools: &'a TokenRegistry, token: &str) -> Option<&'a [String]> {
    match pools.get(token) {
        Some(entry) => {
            info!("found pairs for {}: {:?}", token, entry.pairs);
            Some(entry.pairs.as_slice())
        }
        None => {
            info!("pairs not found for {}", token);
            None
        }
    }
}
