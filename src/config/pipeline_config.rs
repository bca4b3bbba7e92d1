//! Pipeline parameters read from a TOML file.
//!
//! ```toml
//! artifacts_root = "artifacts"
//!
//! [data]
//! tickers = ["AAPL", "MSFT"]
//! start = "2020-01-01"
//! end = "2023-12-31"
//! ```

use crate::domain::market::DateRange;
use crate::infrastructure::storage::{ConfigBox, read_config};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub artifacts_root: Option<PathBuf>,
    pub tickers: Vec<String>,
    pub range: DateRange,
}

impl PipelineSettings {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = read_config(path)
            .with_context(|| format!("Failed to load pipeline config {:?}", path))?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &ConfigBox) -> Result<Self> {
        let artifacts_root = match config.get("artifacts_root") {
            Some(_) => Some(PathBuf::from(config.get_as::<String>("artifacts_root")?)),
            None => None,
        };
        let tickers: Vec<String> = config.get_as("data.tickers")?;
        let start: String = config.get_as("data.start")?;
        let end: String = config.get_as("data.end")?;
        let range = DateRange::parse(&start, &end).context("Invalid [data] date range")?;

        Ok(Self {
            artifacts_root,
            tickers,
            range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_from_config() {
        let config = ConfigBox::new(json!({
            "artifacts_root": "out",
            "data": { "tickers": ["AAPL"], "start": "2022-01-01", "end": "2023-01-01" }
        }));

        let settings = PipelineSettings::from_config(&config).unwrap();
        assert_eq!(settings.artifacts_root, Some(PathBuf::from("out")));
        assert_eq!(settings.tickers, vec!["AAPL"]);
        assert_eq!(settings.range.to_string(), "2022-01-01..2023-01-01");
    }

    #[test]
    fn test_settings_reject_bad_range() {
        let config = ConfigBox::new(json!({
            "data": { "tickers": ["AAPL"], "start": "2023-01-01", "end": "2022-01-01" }
        }));
        assert!(PipelineSettings::from_config(&config).is_err());
    }

    #[test]
    fn test_settings_require_tickers() {
        let config = ConfigBox::new(json!({ "data": { "start": "2022-01-01", "end": "2023-01-01" } }));
        assert!(PipelineSettings::from_config(&config).is_err());
    }
}
