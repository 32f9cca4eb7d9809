//! Utility functions and helpers

use std::future::Future;
use std::time::Duration;

use crate::shared::errors::SwapError;

/// Shorten a Tezos address for log lines: `KT1Xxx...yyyy`
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 14 {
        return address.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Run a network call under a hard deadline
pub async fn with_timeout<T, F>(operation: &str, limit: Duration, fut: F) -> Result<T, SwapError>
where
    F: Future<Output = Result<T, SwapError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(SwapError::Timeout {
            operation: operation.to_string(),
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}

/// Generate a request id for tracing spans
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
