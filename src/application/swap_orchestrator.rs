//! Swap orchestration: registry -> DEX -> supply -> min out -> executor

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};

use crate::domain::execution::{swap_tokens, SwapExecution, SwapRequest, Toolkit};
use crate::domain::pool::{find_dex, get_pools, DexDescriptor};
use crate::domain::supply::{get_supply, Supply};
use crate::infrastructure::api::MarketData;
use crate::math::calculate_min_out;
use crate::report::SwapReport;
use crate::shared::errors::SwapError;
use crate::shared::types::SwapContext;
use crate::shared::utils::generate_id;

/// Everything decided before touching the wallet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapQuote {
    pub pair: String,
    pub dex: DexDescriptor,
    pub address_token_in: String,
    pub address_token_out: String,
    pub token_out_id: u64,
    pub amount_in: u128,
    pub min_amount_out: u128,
    pub slippage: Decimal,
    pub supply: Supply,
}

impl SwapQuote {
    pub fn to_request(&self, is_estimation: bool) -> SwapRequest {
        SwapRequest {
            address_dex: self.dex.address.clone(),
            address_token_in: self.address_token_in.clone(),
            address_token_out: self.address_token_out.clone(),
            amount_in: self.amount_in,
            min_amount_out: self.min_amount_out,
            is_estimation,
            token_out_id: self.token_out_id,
        }
    }
}

/// Resolve addresses, DEX and supply, and compute the minimum amount out.
///
/// The token registry and DEX registry are each fetched once.
pub async fn quote_token_in(
    source: &dyn MarketData,
    ctx: &SwapContext,
    token_in: &str,
    token_out: &str,
    amount_in: u128,
    slippage: Option<Decimal>,
) -> Result<SwapQuote, SwapError> {
    let slippage = slippage.unwrap_or(ctx.default_slippage);
    if amount_in == 0 {
        return Err(SwapError::InvalidAmount("amount_in must be > 0".to_string()));
    }

    // 1. token contracts
    let pools = get_pools(source, ctx).await?;
    let (entry_in, entry_out) = match (pools.get(token_in), pools.get(token_out)) {
        (Some(a), Some(b)) if a.address.is_some() && b.address.is_some() => (a, b),
        _ => {
            return Err(SwapError::NotFound(format!("can't find pool for {}/{}", token_in, token_out)));
        }
    };
    let address_token_in = entry_in.address.clone().unwrap_or_default();
    let address_token_out = entry_out.address.clone().unwrap_or_default();

    // 2. DEX for the pair
    let dex = find_dex(source, ctx, token_in, token_out)
        .await?
        .ok_or_else(|| SwapError::NotFound(format!("can't find DEX for {}/{}", token_in, token_out)))?;

    // 3. reserves and price
    let supply = get_supply(source, ctx, &dex, token_in, token_out).await?;

    // 4. flat slippage on the spot price, floored
    let min_amount_out = calculate_min_out(amount_in, supply.token_in_reserve, supply.token_out_reserve, slippage)?;

    Ok(SwapQuote {
        pair: format!("{}/{}", token_in, token_out),
        dex,
        address_token_in,
        address_token_out,
        token_out_id: entry_out.token_id.unwrap_or(0),
        amount_in,
        min_amount_out,
        slippage,
        supply,
    })
}

/// Quote, then hand the swap to the executor
pub async fn try_swap_token_in(
    source: &dyn MarketData,
    toolkit: &dyn Toolkit,
    ctx: &SwapContext,
    token_in: &str,
    token_out: &str,
    amount_in: u128,
    is_estimation: bool,
    slippage: Option<Decimal>,
) -> Result<(SwapQuote, SwapExecution), SwapError> {
    let quote = quote_token_in(source, ctx, token_in, token_out, amount_in, slippage).await?;
    if ctx.is_debug() {
        debug!(
            pair = %quote.pair,
            found_dex = %quote.dex.address,
            address_token_in = %quote.address_token_in,
            address_token_out = %quote.address_token_out,
            token_amount_in = %quote.amount_in,
            min_amount_out = %quote.min_amount_out,
            price = %quote.supply.price,
            is_estimation,
            "[swap_token_in]"
        );
    }
    let execution = swap_tokens(toolkit, ctx, &quote.to_request(is_estimation)).await?;
    Ok((quote, execution))
}

/// Swap `amount_in` base units of `token_in` for `token_out`.
///
/// Never fails: errors come back as a report with `success == false`.
pub async fn swap_token_in(
    source: &dyn MarketData,
    toolkit: &dyn Toolkit,
    ctx: &SwapContext,
    token_in: &str,
    token_out: &str,
    amount_in: u128,
    is_estimation: bool,
    slippage: Option<Decimal>,
) -> SwapReport {
    let span = info_span!(
        "swap_token_in",
        request_id = %generate_id(),
        pair = %format!("{}/{}", token_in, token_out),
        is_estimation
    );
    async move {
        match try_swap_token_in(source, toolkit, ctx, token_in, token_out, amount_in, is_estimation, slippage).await {
            Ok((quote, execution)) => {
                info!("swap {} ok: max fees {}", quote.pair, execution.max_fees());
                SwapReport::from_execution(quote, execution)
            }
            Err(e) => {
                error!("swap {}/{} failed: {}", token_in, token_out, e);
                SwapReport::failure(&e)
            }
        }
    }
    .instrument(span)
    .await
}

/// Market source and context bundled for repeated swaps
pub struct SwapService {
    source: Arc<dyn MarketData>,
    ctx: SwapContext,
}

impl SwapService {
    pub fn new(source: Arc<dyn MarketData>, ctx: SwapContext) -> Self {
        Self { source, ctx }
    }

    pub fn context(&self) -> &SwapContext {
        &self.ctx
    }

    /// Toggle diagnostic output, returning the new state
    pub fn set_debug_info(&mut self) -> bool {
        self.ctx.set_debug_info()
    }

    pub async fn quote(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: u128,
        slippage: Option<Decimal>,
    ) -> Result<SwapQuote, SwapError> {
        quote_token_in(self.source.as_ref(), &self.ctx, token_in, token_out, amount_in, slippage).await
    }

    pub async fn swap_token_in(
        &self,
        toolkit: &dyn Toolkit,
        token_in: &str,
        token_out: &str,
        amount_in: u128,
        is_estimation: bool,
        slippage: Option<Decimal>,
    ) -> SwapReport {
        swap_token_in(
            self.source.as_ref(),
            toolkit,
            &self.ctx,
            token_in,
            token_out,
            amount_in,
            is_estimation,
            slippage,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::fake_toolkit::{nat_arg, FakeToolkit};
    use crate::domain::execution::{APPROVE_ENTRYPOINT, SWAP_ENTRYPOINT};
    use crate::domain::pool::fixtures::{dex, token};
    use crate::domain::supply::DexStorage;
    use crate::infrastructure::api::InMemoryMarket;
    use rust_decimal_macros::dec;

    const WXTZ: &str = "KT1WxtzWxtzWxtzWxtzWxtzWxtzWxtzWxtz";
    const USDT: &str = "KT1XnTn74bUtxHfDtBmm2bGZAQfhPbvKWR8o";
    const DEX: &str = "KT1DexUsdtXtzDexUsdtXtzDexUsdtXtzDe";
    const USER: &str = "tz1UserUserUserUserUserUserUserUserU";

    /// 1000 XTZ against 3000 USDt: 1 XTZ = 3 USDt
    fn market() -> InMemoryMarket {
        InMemoryMarket::default()
            .with_token(token("XTZ", Some(WXTZ), 6, &["USDt"]))
            .with_token(token("USDt", Some(USDT), 6, &["XTZ"]))
            .with_token(token("CTez", None, 6, &["XTZ"]))
            .with_pool(dex(DEX, ("USDt", 6), ("XTZ", 6), 18))
            .with_storage(
                DEX,
                DexStorage {
                    token1_pool: 3_000_000_000,
                    token2_pool: 1_000_000_000,
                    total_supply: 1_000_000_000_000_000_000_000,
                    lp_fee: 1000,
                },
            )
    }

    fn toolkit() -> FakeToolkit {
        FakeToolkit::new(USER)
            .with_contract(DEX, &[SWAP_ENTRYPOINT])
            .with_contract(WXTZ, &[APPROVE_ENTRYPOINT])
    }

    #[tokio::test]
    async fn test_quote_ten_xtz() {
        let m = market();
        let quote = quote_token_in(&m, &SwapContext::default(), "XTZ", "USDt", 10_000_000, None)
            .await
            .unwrap();
        assert_eq!(quote.supply.price, dec!(3));
        assert_eq!(quote.min_amount_out, 29_850_000);
        assert_eq!(quote.address_token_in, WXTZ);
        assert_eq!(quote.address_token_out, USDT);
        // tokens, pools, storage
        assert_eq!(m.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_end_to_end_estimation() {
        let m = market();
        let tk = toolkit();
        let report = swap_token_in(&m, &tk, &SwapContext::default(), "XTZ", "USDt", 10_000_000, true, Some(dec!(0.005))).await;

        assert!(report.success, "{:?}", report.error);
        assert_eq!(report.max_fees, Some(11_347));
        assert!(report.hash.is_none());
        assert!(tk.sent_batches().is_empty());

        let batches = tk.estimated_batches();
        let batch = &batches[0];
        assert_eq!(nat_arg(&batch[0], 1), 10_000_000);
        assert_eq!(nat_arg(&batch[1], 0), 29_850_000);
        assert_eq!(nat_arg(&batch[1], 4), 10_000_000);
    }

    #[tokio::test]
    async fn test_end_to_end_execution() {
        let m = market();
        let tk = toolkit();
        let report = swap_token_in(&m, &tk, &SwapContext::default(), "XTZ", "USDt", 10_000_000, false, None).await;
        assert!(report.success);
        assert_eq!(report.hash.as_deref(), Some("ooHashOfTheBatch"));
        assert_eq!(tk.sent_batches().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_slippage_quote() {
        let quote = quote_token_in(&market(), &SwapContext::default(), "USDt", "XTZ", 3_000_000, Some(Decimal::ZERO))
            .await
            .unwrap();
        assert_eq!(quote.min_amount_out, 1_000_000);
    }

    #[tokio::test]
    async fn test_quote_with_reserve_past_decimal_range() {
        // 1e29 base units of an 18-decimal token against 3e11 USDt
        let m = InMemoryMarket::default()
            .with_token(token("kUSD", Some("KT1Kusd"), 18, &["USDt"]))
            .with_token(token("USDt", Some(USDT), 6, &["kUSD"]))
            .with_pool(dex(DEX, ("USDt", 6), ("kUSD", 18), 18))
            .with_storage(
                DEX,
                DexStorage {
                    token1_pool: 300_000_000_000_000_000,
                    token2_pool: 100_000_000_000_000_000_000_000_000_000,
                    total_supply: 100_000_000_000_000_000_000_000_000_000,
                    lp_fee: 1000,
                },
            );
        // 1 kUSD -> 3 USDt
        let quote = quote_token_in(&m, &SwapContext::default(), "kUSD", "USDt", 1_000_000_000_000_000_000, Some(Decimal::ZERO))
            .await
            .unwrap();
        assert_eq!(quote.min_amount_out, 3_000_000);
        assert_eq!(quote.supply.price, dec!(3));
    }

    #[tokio::test]
    async fn test_debug_summary_in_estimation_mode() {
        let mut ctx = SwapContext::default();
        ctx.set_debug_info();
        let (quote, execution) = try_swap_token_in(&market(), &toolkit(), &ctx, "XTZ", "USDt", 10_000_000, true, None)
            .await
            .unwrap();
        assert_eq!(quote.min_amount_out, 29_850_000);
        assert!(execution.hash().is_none());
    }

    #[tokio::test]
    async fn test_missing_token_address() {
        let report = swap_token_in(&market(), &toolkit(), &SwapContext::default(), "CTez", "XTZ", 1, true, None).await;
        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some("not found: can't find pool for CTez/XTZ"));
    }

    #[tokio::test]
    async fn test_missing_dex() {
        let m = market().with_token(token("PLENTY", Some("KT1Plenty"), 18, &[]));
        let err = quote_token_in(&m, &SwapContext::default(), "PLENTY", "USDt", 1, None).await.unwrap_err();
        assert!(matches!(err, SwapError::NotFound(ref m) if m.contains("can't find DEX")));
    }

    #[tokio::test]
    async fn test_estimation_failure_report_carries_causes() {
        let tk = toolkit().with_estimate(Err("Error: balance_too_low".to_string()));
        let report = swap_token_in(&market(), &tk, &SwapContext::default(), "XTZ", "USDt", 10_000_000, true, None).await;
        assert!(!report.success);
        let causes = report.causes.unwrap();
        assert!(causes.not_enough_balance);
        assert!(!causes.not_enough_tez);
    }

    #[tokio::test]
    async fn test_service_debug_toggle() {
        let mut service = SwapService::new(Arc::new(market()), SwapContext::default());
        assert!(service.set_debug_info());
        let quote = service.quote("XTZ", "USDt", 1_000_000, None).await.unwrap();
        assert_eq!(quote.min_amount_out, 2_985_000);
    }
}
