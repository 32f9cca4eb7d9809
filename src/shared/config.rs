use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::shared::errors::ConfigError;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "Config.toml";

/// Config loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load an explicit config file, or `Config.toml` when present, or built-in defaults
    pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(p) => Config::from_file(p),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                info!("loading {}", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Config::default()),
        }
    }
}
