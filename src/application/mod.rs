//! Application layer - use cases and services

pub mod commands;
pub mod swap_orchestrator;

pub use commands::{Cli, CommandExecutor, Commands};
pub use swap_orchestrator::{quote_token_in, swap_token_in, try_swap_token_in, SwapQuote, SwapService};
