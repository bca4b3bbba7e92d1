//! Hierarchical key/value view over a loaded config or JSON document.

use crate::domain::errors::StorageError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigBox(Value);

impl ConfigBox {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Looks up a dotted path such as `data.tickers` or `data.tickers.0`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.0, |node, key| match node {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, StorageError> {
        let value = self.get(path).ok_or_else(|| StorageError::MissingKey {
            key: path.to_string(),
        })?;
        serde_json::from_value(value.clone()).map_err(|source| StorageError::KeyType {
            key: path.to_string(),
            source,
        })
    }

    /// Nested table at `path`, if present.
    pub fn section(&self, path: &str) -> Option<ConfigBox> {
        self.get(path).cloned().map(ConfigBox)
    }

    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.0)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

/// Reads a TOML config file into a `ConfigBox`.
///
/// A file with no keys is rejected with `EmptyConfig`.
pub fn read_config(path: impl AsRef<Path>) -> Result<ConfigBox, StorageError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;

    let table: toml::Table = toml::from_str(&content).map_err(|source| StorageError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    if table.is_empty() {
        return Err(StorageError::EmptyConfig {
            path: path.to_path_buf(),
        });
    }

    let value = serde_json::to_value(table).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Config file: {:?} loaded successfully", path);
    Ok(ConfigBox(value))
}
