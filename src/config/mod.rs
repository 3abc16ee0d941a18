mod defaults;
mod io;
mod types;
mod validation;

pub use defaults::*;
pub use io::*;
pub use types::*;
pub use validation::*;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Top-level voxgate configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub remote: RemotePlatformConfig,
    #[serde(default)]
    pub reads: ReadConfig,
}

impl Config {
    /// Load configuration from a file, or defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let value = read_config_file(Path::new(path))?;
                let config: Config = serde_json::from_value(value)
                    .with_context(|| format!("Invalid configuration in '{path}'"))?;
                info!("Loaded configuration from {path}");
                config
            }
            None => Config::default(),
        };
        validate_config_object(&config)?;
        Ok(config)
    }

    /// Write a default configuration file.
    pub fn write_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = serde_json::to_string_pretty(&config)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file '{path}'"))?;
        Ok(())
    }
}
