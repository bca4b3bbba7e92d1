//! Market data provider configuration parsing from environment variables.

use std::env;

/// Alpaca market data API configuration
#[derive(Debug, Clone, Default)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub secret_key: String,
    pub data_url: String,
    pub feed: String,
}

impl AlpacaConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("ALPACA_API_KEY").unwrap_or_default(),
            secret_key: env::var("ALPACA_SECRET_KEY").unwrap_or_default(),
            data_url: env::var("ALPACA_DATA_URL")
                .unwrap_or_else(|_| "https://data.alpaca.markets".to_string()),
            feed: env::var("ALPACA_FEED").unwrap_or_else(|_| "iex".to_string()),
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}
