//! Wallet toolkit boundary. Signing, Michelson encoding, estimation and
//! injection live in an external toolkit; this crate only drives it.

use async_trait::async_trait;
use std::sync::Arc;

use super::{Estimate, LimitedOperation, MichelsonArg, Operation, TransferParams};
use crate::shared::errors::ToolkitError;

/// Wallet-side handle on a deployed contract
pub trait ContractHandle: Send + Sync {
    fn address(&self) -> &str;

    fn has_entrypoint(&self, entrypoint: &str) -> bool;

    /// Encode a call to `entrypoint` with positional `args` into transfer params
    fn transfer_params(&self, entrypoint: &str, args: &[MichelsonArg]) -> Result<TransferParams, ToolkitError>;
}

#[async_trait]
pub trait Toolkit: Send + Sync {
    /// Address of the signer
    async fn public_key_hash(&self) -> Result<String, ToolkitError>;

    /// Contract handle at `address`, `None` when the wallet can't resolve it
    async fn contract_at(&self, address: &str) -> Result<Option<Arc<dyn ContractHandle>>, ToolkitError>;

    /// Gas/storage limits for each operation of the batch, in order
    async fn estimate_batch(&self, ops: &[Operation]) -> Result<Vec<Estimate>, ToolkitError>;

    /// Sign and inject the batch, returning the operation hash
    async fn send_batch(&self, ops: &[LimitedOperation]) -> Result<String, ToolkitError>;
}
