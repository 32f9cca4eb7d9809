//! Error handling for the swap helper

use serde::Serialize;
use thiserror::Error;

/// Known causes behind a rejected batch estimation, matched on the node's error message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EstimationCauses {
    /// Source account has never been revealed on chain
    pub not_revealed: bool,
    /// Not enough tez to pay fees / storage burn
    pub not_enough_tez: bool,
    /// Not enough of the input token (or tez) for the transfer itself
    pub not_enough_balance: bool,
}

impl EstimationCauses {
    pub fn classify(message: &str) -> Self {
        Self {
            not_revealed: message.contains("reveal"),
            not_enough_tez: message.contains("storage_exhausted"),
            not_enough_balance: message.contains("subtraction_underflow")
                || message.contains("balance_too_low")
                || message.contains("NotEnoughBalance"),
        }
    }

    pub fn is_known(&self) -> bool {
        self.not_revealed || self.not_enough_tez || self.not_enough_balance
    }
}

/// Swap-related errors
#[derive(Error, Debug, Clone)]
pub enum SwapError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("malformed payload from {source_name}: {reason}")]
    Decode { source_name: String, reason: String },

    #[error("{operation} timed out after {timeout_ms} ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("can't match {symbol} symbol against DEX {dex} ({token1}/{token2})")]
    UnmatchedSymbol {
        symbol: String,
        dex: String,
        token1: String,
        token2: String,
    },

    #[error("DEX {0} has an empty input reserve")]
    ZeroLiquidity(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("can't fetch contracts of DEX & token-in: {0}")]
    ContractResolution(String),

    #[error("contract {address} doesn't have a usable {entrypoint}(..) method: {detail}")]
    InterfaceMismatch {
        address: String,
        entrypoint: String,
        detail: String,
    },

    #[error("estimation rejected: {message}")]
    Estimation {
        message: String,
        causes: EstimationCauses,
    },

    #[error("submission failed: {0}")]
    Submission(String),
}

/// Error reported by a wallet toolkit implementation
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ToolkitError {
    pub message: String,
}

impl ToolkitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}
