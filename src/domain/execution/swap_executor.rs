//! Approve + Swap batch: estimate limits, then return the quote or submit

use tracing::{debug, error, info};

use super::{Estimate, LimitedOperation, Operation, SwapExecution, SwapRequest, Toolkit, TransactionBuilder};
use crate::shared::errors::{EstimationCauses, SwapError};
use crate::shared::types::SwapContext;
use crate::shared::utils::{format_address, with_timeout};

/// Swap FA1.2 token-in for token-out on a Plenty DEX.
///
/// With `request.is_estimation` only the two read-only estimation calls
/// reach the node; otherwise the limited batch is signed and injected.
pub async fn swap_tokens(
    toolkit: &dyn Toolkit,
    ctx: &SwapContext,
    request: &SwapRequest,
) -> Result<SwapExecution, SwapError> {
    let recipient = with_timeout("signer address", ctx.timeout, async {
        toolkit
            .public_key_hash()
            .await
            .map_err(|e| SwapError::ContractResolution(format!("signer address: {}", e)))
    })
    .await?;
    if ctx.is_debug() {
        debug!(source = %recipient, dex = %request.address_dex, token_in = %request.address_token_in, "[swap_tokens]");
    }

    let contract_dex = resolve_contract(toolkit, ctx, &request.address_dex).await?;
    let contract_token_in = resolve_contract(toolkit, ctx, &request.address_token_in).await?;

    let builder = TransactionBuilder::new(contract_dex.as_ref(), contract_token_in.as_ref())?;
    let op_approve = builder.approve(request)?;
    let op_swap = builder.swap(request, &recipient)?;
    if ctx.is_debug() {
        debug!(?op_approve, "[swap_tokens] approve(..)");
        debug!(?op_swap, "[swap_tokens] Swap(..)");
    }
    let batch_ops = vec![op_approve, op_swap];

    let limits = estimate(toolkit, ctx, &batch_ops).await?;
    let limited_fees_batch: Vec<LimitedOperation> = batch_ops
        .into_iter()
        .zip(limits)
        .map(|(op, limit)| LimitedOperation::new(op, limit))
        .collect();

    if ctx.is_debug() {
        for op in &limited_fees_batch {
            debug!("[batch_op] {}(..) = {}", op.op.params.entrypoint(), op.fees_limit());
        }
    }
    let max_fees = total_fees(&limited_fees_batch);

    if request.is_estimation {
        if ctx.is_debug() {
            debug!(
                max_fees,
                approve_gas = limited_fees_batch[0].gas_limit,
                approve_storage = limited_fees_batch[0].storage_limit,
                swap_gas = limited_fees_batch[1].gas_limit,
                swap_storage = limited_fees_batch[1].storage_limit,
                "GAS_LIMIT & STORAGE_LIMIT"
            );
        }
        return Ok(SwapExecution::Estimated {
            max_fees,
            detailed_batch: limited_fees_batch,
        });
    }

    if ctx.is_debug() {
        debug!(batch = ?limited_fees_batch, "EXECUTE");
    }
    let hash = with_timeout("send batch", ctx.timeout, async {
        toolkit.send_batch(&limited_fees_batch).await.map_err(|e| {
            error!("[swap_tokens] batch submission failed: {}", e);
            SwapError::Submission(e.message)
        })
    })
    .await?;
    info!("[swap_tokens] submitted batch {} (max fees {})", hash, max_fees);

    Ok(SwapExecution::Submitted { hash, max_fees })
}

async fn resolve_contract(
    toolkit: &dyn Toolkit,
    ctx: &SwapContext,
    address: &str,
) -> Result<std::sync::Arc<dyn super::ContractHandle>, SwapError> {
    let contract = with_timeout("resolve contract", ctx.timeout, async {
        toolkit
            .contract_at(address)
            .await
            .map_err(|e| SwapError::ContractResolution(format!("{}: {}", address, e)))
    })
    .await?;
    contract.ok_or_else(|| {
        error!("can't fetch contract {}", format_address(address));
        SwapError::ContractResolution(address.to_string())
    })
}

async fn estimate(toolkit: &dyn Toolkit, ctx: &SwapContext, ops: &[Operation]) -> Result<Vec<Estimate>, SwapError> {
    let limits = with_timeout("estimate batch", ctx.timeout, async {
        toolkit.estimate_batch(ops).await.map_err(|e| {
            error!("[swap_tokens] ERROR on estimate.batch(..): {}", e.message);
            let causes = EstimationCauses::classify(&e.message);
            SwapError::Estimation {
                message: e.message,
                causes,
            }
        })
    })
    .await?;

    if limits.len() != ops.len() {
        return Err(SwapError::Estimation {
            message: format!("expected {} estimates, got {}", ops.len(), limits.len()),
            causes: EstimationCauses::default(),
        });
    }
    Ok(limits)
}

/// Sum of gas + storage limits over the batch
fn total_fees(batch: &[LimitedOperation]) -> u64 {
    batch.iter().map(LimitedOperation::fees_limit).fold(0u64, u64::saturating_add)
}
