//! Configuration module for Stockfolio.
//!
//! Runtime settings come from environment variables (optionally seeded from a
//! `.env` file by the binary); pipeline parameters can also be read from TOML.

mod broker_config;
mod pipeline_config;

pub use broker_config::AlpacaConfig;
pub use pipeline_config::PipelineSettings;

use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for generated artifacts (tables, reports, blobs)
    pub data_dir: PathBuf,
    pub alpaca: AlpacaConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("artifacts")),
            alpaca: AlpacaConfig::from_env(),
        }
    }

    pub fn raw_data_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn indicators_dir(&self) -> PathBuf {
        self.data_dir.join("indicators")
    }

    /// Default destination for the indicator table computed from `input`:
    /// same file name, under `indicators_dir`.
    pub fn indicators_output_for(&self, input: &Path) -> PathBuf {
        let file_name = input
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "indicators.csv".into());
        self.indicators_dir().join(file_name)
    }
}
