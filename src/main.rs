use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use plenty_swap::application::{Cli, CommandExecutor};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    let default_filter = if config.swap.debug { "info,plenty_swap=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    CommandExecutor::execute(cli.command, config).await
}
