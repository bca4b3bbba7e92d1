use crate::domain::errors::MarketDataError;
use crate::domain::market::DateRange;
use crate::domain::price_table::PriceTable;
use async_trait::async_trait;

/// Receives a notification each time an indicator column is written.
///
/// Injected into the indicator engine so callers decide where these events go.
pub trait IndicatorObserver: Send + Sync {
    fn on_indicator(&self, name: &str, column: &str, window: usize);

    fn on_pipeline_complete(&self, _rows: usize) {}
}

// Need async_trait for async functions in traits
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Daily price history for `symbols` over `range`, ordered by date, with
    /// every row holding a missing value removed.
    async fn load_stock_data(
        &self,
        symbols: &[String],
        range: &DateRange,
    ) -> Result<PriceTable, MarketDataError>;
}
