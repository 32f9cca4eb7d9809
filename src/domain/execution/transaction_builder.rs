//! Builds the approve + Swap operation pair

use super::{ContractHandle, MichelsonArg, Operation, SwapRequest};
use crate::shared::errors::{SwapError, ToolkitError};

/// FA1.2 allowance entrypoint on the input token
pub const APPROVE_ENTRYPOINT: &str = "approve";
/// Plenty DEX swap entrypoint
pub const SWAP_ENTRYPOINT: &str = "Swap";

pub struct TransactionBuilder<'a> {
    dex: &'a dyn ContractHandle,
    token_in: &'a dyn ContractHandle,
}

impl<'a> TransactionBuilder<'a> {
    /// Fails with `InterfaceMismatch` unless the token has `approve` and the DEX has `Swap`
    pub fn new(dex: &'a dyn ContractHandle, token_in: &'a dyn ContractHandle) -> Result<Self, SwapError> {
        for (contract, entrypoint) in [(token_in, APPROVE_ENTRYPOINT), (dex, SWAP_ENTRYPOINT)] {
            if !contract.has_entrypoint(entrypoint) {
                return Err(SwapError::InterfaceMismatch {
                    address: contract.address().to_string(),
                    entrypoint: entrypoint.to_string(),
                    detail: "entrypoint not found".to_string(),
                });
            }
        }
        Ok(Self { dex, token_in })
    }

    /// `approve(spender = DEX, value = amount_in)` on the input token.
    /// Without it the DEX call fails on allowance.
    pub fn approve(&self, request: &SwapRequest) -> Result<Operation, SwapError> {
        let args = [
            MichelsonArg::Address(self.dex.address().to_string()),
            MichelsonArg::Nat(request.amount_in),
        ];
        let params = self
            .token_in
            .transfer_params(APPROVE_ENTRYPOINT, &args)
            .map_err(|e| encode_err(self.token_in, APPROVE_ENTRYPOINT, e))?;
        Ok(Operation::transaction(params))
    }

    /// `Swap(MinimumTokenOut, recipient, requiredTokenAddress, requiredTokenId, tokenAmountIn)`
    pub fn swap(&self, request: &SwapRequest, recipient: &str) -> Result<Operation, SwapError> {
        let args = [
            MichelsonArg::Nat(request.min_amount_out),
            MichelsonArg::Address(recipient.to_string()),
            MichelsonArg::Address(request.address_token_out.clone()),
            MichelsonArg::Nat(request.token_out_id as u128),
            MichelsonArg::Nat(request.amount_in),
        ];
        let params = self
            .dex
            .transfer_params(SWAP_ENTRYPOINT, &args)
            .map_err(|e| encode_err(self.dex, SWAP_ENTRYPOINT, e))?;
        Ok(Operation::transaction(params))
    }
}

fn encode_err(contract: &dyn ContractHandle, entrypoint: &str, e: ToolkitError) -> SwapError {
    SwapError::InterfaceMismatch {
        address: contract.address().to_string(),
        entrypoint: entrypoint.to_string(),
        detail: e.message,
    }
}
