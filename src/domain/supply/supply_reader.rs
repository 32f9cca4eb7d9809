//! Reads DEX storage and derives reserves and price

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{DexStorage, Supply};
use crate::domain::pool::DexDescriptor;
use crate::infrastructure::api::MarketData;
use crate::math::{normalize, spot_price};
use crate::shared::errors::SwapError;
use crate::shared::types::SwapContext;
use crate::shared::utils::with_timeout;

/// Fetch the storage of `dex` and derive the supply oriented `token_in -> token_out`.
///
/// Each call is a fresh snapshot; nothing ties it to the registry read that
/// produced `dex`.
pub async fn get_supply(
    source: &dyn MarketData,
    ctx: &SwapContext,
    dex: &DexDescriptor,
    token_in: &str,
    token_out: &str,
) -> Result<Supply, SwapError> {
    if dex.address.is_empty() {
        return Err(SwapError::NotFound(format!("can't find pair {}-{}", token_in, token_out)));
    }
    if ctx.is_debug() {
        debug!("found DEX [{}] {}", dex.address, dex.pair_label());
    }

    let storage = with_timeout("fetch storage", ctx.timeout, source.fetch_storage(&dex.address)).await?;
    if ctx.is_debug() {
        debug!(?storage, "DEX storage");
    }

    let supply = derive_supply(dex, &storage, token_in, token_out)?;
    if ctx.is_debug() {
        debug!(?supply, "[get_supply]");
    }
    Ok(supply)
}

fn derive_supply(dex: &DexDescriptor, storage: &DexStorage, token_in: &str, token_out: &str) -> Result<Supply, SwapError> {
    let unmatched = |symbol: &str| SwapError::UnmatchedSymbol {
        symbol: symbol.to_string(),
        dex: dex.address.clone(),
        token1: dex.token1.symbol.clone(),
        token2: dex.token2.symbol.clone(),
    };

    // orientation follows token_out; token_in must then be the other side
    let (in_raw, in_side, out_raw, out_side) = if token_out == dex.token2.symbol {
        (storage.token1_pool, &dex.token1, storage.token2_pool, &dex.token2)
    } else if token_out == dex.token1.symbol {
        (storage.token2_pool, &dex.token2, storage.token1_pool, &dex.token1)
    } else {
        return Err(unmatched(token_out));
    };
    if in_side.symbol != token_in {
        return Err(unmatched(token_in));
    }

    let token_in_supply = normalize(in_raw, in_side.decimals)?;
    let token_out_supply = normalize(out_raw, out_side.decimals)?;
    let lp_token_supply = normalize_lp(dex, "totalSupply", storage.total_supply);
    let lp_fees = normalize_lp(dex, "lpFee", storage.lp_fee);

    if in_raw == 0 {
        return Err(SwapError::ZeroLiquidity(dex.address.clone()));
    }
    let price = spot_price(token_in_supply, token_out_supply)
        .ok_or_else(|| SwapError::ZeroLiquidity(dex.address.clone()))?;

    Ok(Supply {
        price,
        token_in_supply,
        token_out_supply,
        token_in_reserve: in_raw,
        token_out_reserve: out_raw,
        lp_token_supply,
        lp_fees,
        token_in_decimals: in_side.decimals,
        token_out_decimals: out_side.decimals,
        dex_contract: dex.address.clone(),
    })
}

fn normalize_lp(dex: &DexDescriptor, field: &str, raw: u128) -> Option<Decimal> {
    match normalize(raw, dex.lp_token.decimals) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("[get_supply] {} of {} not representable: {}", field, dex.address, e);
            None
        }
    }
}
