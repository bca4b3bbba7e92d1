use crate::domain::errors::MarketDataError;
use crate::domain::market::DailyBar;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: String,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
}

impl AlpacaBar {
    /// Converts to a daily bar keyed by the calendar day of its RFC 3339 timestamp.
    pub fn to_daily_bar(&self) -> Result<DailyBar, MarketDataError> {
        let date = chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|e| {
                MarketDataError::Decode(format!("bad bar timestamp {:?}: {}", self.timestamp, e))
            })?
            .date_naive();

        Ok(DailyBar {
            date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}

/// One page of the multi-symbol bars endpoint.
#[derive(Debug, Deserialize)]
pub struct AlpacaBarsPage {
    #[serde(default)]
    pub bars: Option<HashMap<String, Vec<AlpacaBar>>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
