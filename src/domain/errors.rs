use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the indicator computations and `PriceTable` accessors
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Column {column} has {actual} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// Errors related to configuration, persistence and file helpers
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Cannot parse {value:?} in column {column} (row {row})")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Config file is empty: {path}")]
    EmptyConfig { path: PathBuf },

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Missing config key: {key}")]
    MissingKey { key: String },

    #[error("Config key {key} has unexpected shape: {source}")]
    KeyType {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Table(#[from] IndicatorError),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors related to fetching historical market data
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Market data API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode market data response: {0}")]
    Decode(String),

    #[error(transparent)]
    Table(#[from] IndicatorError),
}
