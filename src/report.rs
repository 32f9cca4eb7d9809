// src/report.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::SwapQuote;
use crate::domain::execution::{LimitedOperation, SwapExecution};
use crate::shared::errors::{EstimationCauses, SwapError};

/// Terminal result of a swap call. Callers branch on `success`.
#[derive(Debug, Clone, Serialize)]
pub struct SwapReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the node rejected the estimation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causes: Option<EstimationCauses>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fees: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_batch: Option<Vec<LimitedOperation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<SwapQuote>,
    pub timestamp: DateTime<Utc>,
}

impl SwapReport {
    pub fn failure(err: &SwapError) -> Self {
        let causes = match err {
            SwapError::Estimation { causes, .. } => Some(*causes),
            _ => None,
        };
        Self {
            success: false,
            error: Some(err.to_string()),
            causes,
            hash: None,
            max_fees: None,
            detailed_batch: None,
            quote: None,
            timestamp: Utc::now(),
        }
    }

    pub fn from_execution(quote: SwapQuote, execution: SwapExecution) -> Self {
        let (hash, max_fees, detailed_batch) = match execution {
            SwapExecution::Estimated { max_fees, detailed_batch } => (None, max_fees, Some(detailed_batch)),
            SwapExecution::Submitted { hash, max_fees } => (Some(hash), max_fees, None),
        };
        Self {
            success: true,
            error: None,
            causes: None,
            hash,
            max_fees: Some(max_fees),
            detailed_batch,
            quote: Some(quote),
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
