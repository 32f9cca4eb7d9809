//! CLI commands and handlers. Everything here is read-only; submitting a
//! swap needs a signing `Toolkit` supplied by the embedding application.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::application::quote_token_in;
use crate::config::Config;
use crate::domain::pool::{find_dex, get_pools, pairs_of};
use crate::domain::supply::get_supply;
use crate::infrastructure::api::{MarketData, PlentyApi};
use crate::shared::config::ConfigLoader;
use crate::shared::types::SwapContext;

#[derive(Parser, Debug)]
#[command(name = "plenty-swap")]
#[command(version, about = "Plenty Network swap helper: pools, prices and swap quotes")]
pub struct Cli {
    /// Path to config file (defaults to ./Config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit diagnostic detail (amounts, addresses, fee breakdown)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Timeout for each network call, in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tokens of the Plenty registry
    Tokens,

    /// Tokens tradable against TOKEN
    Pairs { token: String },

    /// DEX contract servicing a pair
    Dex { token_in: String, token_out: String },

    /// Reserves, LP supply and spot price of the pair's DEX
    Supply { token_in: String, token_out: String },

    /// Minimum amount out for AMOUNT_IN base units of TOKEN_IN
    Quote {
        token_in: String,
        token_out: String,
        amount_in: u128,

        /// Slippage tolerance as a fraction (0.005 = 0.5%)
        #[arg(long)]
        slippage: Option<Decimal>,
    },
}

impl Cli {
    /// Config file merged with CLI overrides (CLI has higher priority)
    pub fn load_config(&self) -> Result<Config> {
        let mut cfg = ConfigLoader::load_config(self.config.as_deref()).context("load config")?;
        if self.debug {
            cfg.swap.debug = true;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            cfg.network.timeout_ms = timeout_ms;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands, config: Config) -> Result<()> {
        let ctx = config.context();
        let api = PlentyApi::new(config.endpoints.clone(), Duration::from_millis(config.network.timeout_ms))?;

        match command {
            Commands::Tokens => Self::execute_tokens_command(&api, &ctx).await,
            Commands::Pairs { token } => Self::execute_pairs_command(&api, &ctx, &token).await,
            Commands::Dex { token_in, token_out } => Self::execute_dex_command(&api, &ctx, &token_in, &token_out).await,
            Commands::Supply { token_in, token_out } => {
                Self::execute_supply_command(&api, &ctx, &token_in, &token_out).await
            }
            Commands::Quote {
                token_in,
                token_out,
                amount_in,
                slippage,
            } => {
                let quote = quote_token_in(&api, &ctx, &token_in, &token_out, amount_in, slippage).await?;
                info!("{}: {} in -> at least {} out", quote.pair, quote.amount_in, quote.min_amount_out);
                print_json(&quote)
            }
        }
    }

    async fn execute_tokens_command(api: &dyn MarketData, ctx: &SwapContext) -> Result<()> {
        let pools = get_pools(api, ctx).await?;
        for (symbol, entry) in &pools {
            println!(
                "{:<12} {:>2} decimals  {}",
                symbol,
                entry.decimals,
                entry.address.as_deref().unwrap_or("-")
            );
        }
        info!("{} tokens", pools.len());
        Ok(())
    }

    async fn execute_pairs_command(api: &dyn MarketData, ctx: &SwapContext, token: &str) -> Result<()> {
        let pools = get_pools(api, ctx).await?;
        let pairs = pairs_of(&pools, token).ok_or_else(|| anyhow!("pairs not found for {}", token))?;
        print_json(&pairs)
    }

    async fn execute_dex_command(api: &dyn MarketData, ctx: &SwapContext, token_in: &str, token_out: &str) -> Result<()> {
        let dex = find_dex(api, ctx, token_in, token_out)
            .await?
            .ok_or_else(|| anyhow!("can't find DEX for {}/{}", token_in, token_out))?;
        print_json(&dex)
    }

    async fn execute_supply_command(
        api: &dyn MarketData,
        ctx: &SwapContext,
        token_in: &str,
        token_out: &str,
    ) -> Result<()> {
        let dex = find_dex(api, ctx, token_in, token_out)
            .await?
            .ok_or_else(|| anyhow!("can't find DEX for {}/{}", token_in, token_out))?;
        let supply = get_supply(api, ctx, &dex, token_in, token_out).await?;
        print_json(&supply)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
