//! Pair locator: which DEX contract trades a given token pair

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::DexDescriptor;
use crate::infrastructure::api::MarketData;
use crate::shared::errors::SwapError;
use crate::shared::types::SwapContext;
use crate::shared::utils::with_timeout;

/// Pool id -> DEX descriptor, as published by the Plenty pools endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DexRegistry {
    pools: BTreeMap<String, DexDescriptor>,
}

impl DexRegistry {
    pub fn new(pools: BTreeMap<String, DexDescriptor>) -> Self {
        Self { pools }
    }

    /// First DEX serving the pair in either order.
    ///
    /// Several DEXes may serve the same pair; the registry is keyed by pool
    /// id, so the lowest id wins. Callers should not read more into that.
    pub fn find(&self, token_in: &str, token_out: &str) -> Option<&DexDescriptor> {
        self.pools.values().find(|dex| dex.serves(token_in, token_out))
    }

    /// Every DEX serving the pair
    pub fn find_all<'a>(&'a self, token_in: &'a str, token_out: &'a str) -> impl Iterator<Item = &'a DexDescriptor> + 'a {
        self.pools.values().filter(move |dex| dex.serves(token_in, token_out))
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Fetch the DEX registry and locate the pair. `Ok(None)` means the pair is not supported.
pub async fn find_dex(
    source: &dyn MarketData,
    ctx: &SwapContext,
    token_in: &str,
    token_out: &str,
) -> Result<Option<DexDescriptor>, SwapError> {
    let registry = with_timeout("fetch pools", ctx.timeout, source.fetch_dex_pools()).await?;
    let dex = registry.find(token_in, token_out).cloned();
    if ctx.is_debug() {
        debug!(
            pools = registry.len(),
            found = ?dex.as_ref().map(|d| d.address.as_str()),
            "find_dex {}/{}",
            token_in,
            token_out
        );
    }
    Ok(dex)
}
