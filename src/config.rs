use rust_decimal::Decimal;
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

use crate::shared::errors::ConfigError;
use crate::shared::types::{SwapContext, DEFAULT_SLIPPAGE, DEFAULT_TIMEOUT_MS};

pub const PLENTY_TOKENS_URL: &str = "https://config.mainnet.plenty.network/tokens";
pub const PLENTY_POOLS_URL: &str = "https://config.mainnet.plenty.network/pools";
pub const TZKT_API_URL: &str = "https://api.tzkt.io/v1";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointsCfg {
    pub tokens_url: String,
    pub pools_url: String,
    pub tzkt_url: String,
}

impl Default for EndpointsCfg {
    fn default() -> Self {
        Self {
            tokens_url: PLENTY_TOKENS_URL.to_string(),
            pools_url: PLENTY_POOLS_URL.to_string(),
            tzkt_url: TZKT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkCfg {
    pub timeout_ms: u64,
}

impl Default for NetworkCfg {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwapCfg {
    pub slippage: Decimal,
    pub debug: bool,
}

impl Default for SwapCfg {
    fn default() -> Self {
        Self {
            slippage: DEFAULT_SLIPPAGE,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: EndpointsCfg,
    pub network: NetworkCfg,
    pub swap: SwapCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.swap.slippage < Decimal::ZERO || self.swap.slippage >= Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "swap.slippage must be in [0, 1), got {}",
                self.swap.slippage
            )));
        }
        if self.network.timeout_ms == 0 {
            return Err(ConfigError::Invalid("network.timeout_ms must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn context(&self) -> SwapContext {
        SwapContext::new(
            self.swap.debug,
            Duration::from_millis(self.network.timeout_ms),
            self.swap.slippage,
        )
    }
}
