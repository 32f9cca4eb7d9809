//! Execution domain - approve + Swap batch building, estimation and submission

mod swap_executor;
#[cfg(test)]
pub(crate) mod fake_toolkit;
mod transaction_builder;
mod wallet;

pub use swap_executor::swap_tokens;
pub use transaction_builder::{TransactionBuilder, APPROVE_ENTRYPOINT, SWAP_ENTRYPOINT};
pub use wallet::{ContractHandle, Toolkit};

use serde::{Deserialize, Serialize};

/// Typed argument for an entrypoint call; the toolkit encodes it to Michelson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MichelsonArg {
    Address(String),
    /// Michelson nat, serialized as a decimal string
    Nat(#[serde(with = "nat_string")] u128),
}

mod nat_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub entrypoint: String,
    /// Micheline expression produced by the toolkit
    pub value: serde_json::Value,
}

/// Transaction parameters for a contract call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferParams {
    pub to: String,
    /// Tez attached, in mutez
    pub amount: u64,
    pub parameter: Option<Parameter>,
}

impl TransferParams {
    pub fn entrypoint(&self) -> &str {
        self.parameter.as_ref().map(|p| p.entrypoint.as_str()).unwrap_or("default")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Transaction,
}

/// One operation of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OpKind,
    #[serde(flatten)]
    pub params: TransferParams,
}

impl Operation {
    pub fn transaction(params: TransferParams) -> Self {
        Self {
            kind: OpKind::Transaction,
            params,
        }
    }
}

/// Limits returned by the node for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub gas_limit: u64,
    pub storage_limit: u64,
}

/// An operation with its estimated limits attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitedOperation {
    #[serde(flatten)]
    pub op: Operation,
    pub gas_limit: u64,
    pub storage_limit: u64,
}

impl LimitedOperation {
    pub fn new(op: Operation, estimate: Estimate) -> Self {
        Self {
            op,
            gas_limit: estimate.gas_limit,
            storage_limit: estimate.storage_limit,
        }
    }

    /// Per-operation fee figure: gas limit + storage limit
    pub fn fees_limit(&self) -> u64 {
        self.gas_limit.saturating_add(self.storage_limit)
    }
}

/// Inputs of a token -> token swap on a known DEX
#[derive(Debug, Clone, PartialEq)]
pub struct SwapRequest {
    pub address_dex: String,
    pub address_token_in: String,
    pub address_token_out: String,
    /// Base units of token_in
    pub amount_in: u128,
    /// Base units of token_out
    pub min_amount_out: u128,
    pub is_estimation: bool,
    pub token_out_id: u64,
}

/// Outcome of `swap_tokens`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SwapExecution {
    /// Dry run: nothing sent
    Estimated {
        max_fees: u64,
        detailed_batch: Vec<LimitedOperation>,
    },
    Submitted {
        hash: String,
        max_fees: u64,
    },
}

impl SwapExecution {
    pub fn max_fees(&self) -> u64 {
        match self {
            SwapExecution::Estimated { max_fees, .. } | SwapExecution::Submitted { max_fees, .. } => *max_fees,
        }
    }

    pub fn hash(&self) -> Option<&str> {
        match self {
            SwapExecution::Submitted { hash, .. } => Some(hash),
            SwapExecution::Estimated { .. } => None,
        }
    }
}
