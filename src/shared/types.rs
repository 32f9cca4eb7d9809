//! Common types used across the application

use rust_decimal::Decimal;
use std::time::Duration;
use tracing::info;

/// Default slippage tolerance: 0.5%
pub const DEFAULT_SLIPPAGE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Default bound for every network call, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Per-call settings handed to every operation.
///
/// `debug` gates the diagnostic output (intermediate amounts, addresses,
/// fee breakdown); terminal success/failure is always logged.
#[derive(Debug, Clone)]
pub struct SwapContext {
    pub debug: bool,
    pub timeout: Duration,
    pub default_slippage: Decimal,
}

impl Default for SwapContext {
    fn default() -> Self {
        Self {
            debug: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            default_slippage: DEFAULT_SLIPPAGE,
        }
    }
}

impl SwapContext {
    pub fn new(debug: bool, timeout: Duration, default_slippage: Decimal) -> Self {
        Self {
            debug,
            timeout,
            default_slippage,
        }
    }

    /// Flip the debug flag and return its new value
    pub fn set_debug_info(&mut self) -> bool {
        self.debug = !self.debug;
        info!(is_debug = self.debug, "debug info toggled");
        self.debug
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}
