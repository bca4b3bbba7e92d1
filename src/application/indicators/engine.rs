use crate::application::indicators::rolling::{rolling_mean, rsi_series};
use crate::domain::errors::IndicatorError;
use crate::domain::ports::IndicatorObserver;
use crate::domain::price_table::PriceTable;
use crate::infrastructure::observability::TracingObserver;
use std::sync::Arc;

pub const CLOSE_COLUMN: &str = "Close";
pub const RSI_COLUMN: &str = "RSI";
pub const SHORT_MA_WINDOW: usize = 50;
pub const LONG_MA_WINDOW: usize = 200;
pub const DEFAULT_RSI_WINDOW: usize = 14;

/// Name of the column written by a moving average over `window` periods.
pub fn moving_average_column(window: usize) -> String {
    format!("MA_{}", window)
}

/// Computes indicator columns and writes them onto a `PriceTable`.
///
/// Every operation validates its inputs before touching the table, then
/// inserts (or overwrites) exactly one column. There is no rollback across
/// operations: a failure in a later step leaves earlier columns in place.
pub struct IndicatorEngine {
    observer: Arc<dyn IndicatorObserver>,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(Arc::new(TracingObserver))
    }
}

impl IndicatorEngine {
    pub fn new(observer: Arc<dyn IndicatorObserver>) -> Self {
        Self { observer }
    }

    /// Appends `MA_<window>`: the trailing mean of `column` over `window` rows.
    pub fn compute_moving_average<'a>(
        &self,
        table: &'a mut PriceTable,
        column: &str,
        window: usize,
    ) -> Result<&'a mut PriceTable, IndicatorError> {
        let values = rolling_mean(table.column(column)?, window)?;
        let name = moving_average_column(window);
        table.insert_column(name.as_str(), values)?;

        self.observer.on_indicator(&name, column, window);
        Ok(table)
    }

    /// Appends `RSI` computed from `column` over `window` periods.
    pub fn compute_rsi<'a>(
        &self,
        table: &'a mut PriceTable,
        column: &str,
        window: usize,
    ) -> Result<&'a mut PriceTable, IndicatorError> {
        let values = rsi_series(table.column(column)?, window)?;
        table.insert_column(RSI_COLUMN, values)?;

        self.observer.on_indicator(RSI_COLUMN, column, window);
        Ok(table)
    }

    pub fn compute_rsi_default<'a>(
        &self,
        table: &'a mut PriceTable,
        column: &str,
    ) -> Result<&'a mut PriceTable, IndicatorError> {
        self.compute_rsi(table, column, DEFAULT_RSI_WINDOW)
    }

    /// Adds `MA_50`, `MA_200` and `RSI` (14) over `Close`, in that order.
    pub fn create_technical_indicators<'a>(
        &self,
        table: &'a mut PriceTable,
    ) -> Result<&'a mut PriceTable, IndicatorError> {
        self.compute_moving_average(table, CLOSE_COLUMN, SHORT_MA_WINDOW)?;
        self.compute_moving_average(table, CLOSE_COLUMN, LONG_MA_WINDOW)?;
        self.compute_rsi(table, CLOSE_COLUMN, DEFAULT_RSI_WINDOW)?;

        self.observer.on_pipeline_complete(table.len());
        Ok(table)
    }
}
