use crate::domain::errors::MarketDataError;
use crate::domain::market::{DailyBar, DateRange, build_history_table};
use crate::domain::ports::MarketDataService;
use crate::domain::price_table::PriceTable;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory market data source for tests and offline runs.
#[derive(Default)]
pub struct MockMarketDataService {
    bars: RwLock<HashMap<String, Vec<DailyBar>>>,
}

impl MockMarketDataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bars(&self, symbol: &str, bars: Vec<DailyBar>) {
        let mut store = match self.bars.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        store.insert(symbol.to_uppercase(), bars);
    }

    /// Seeds `symbol` with one bar per weekday from `start`, closing at the
    /// given prices in order.
    pub fn with_closes(self, symbol: &str, start: NaiveDate, closes: &[f64]) -> Self {
        let bars = start
            .iter_days()
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .zip(closes)
            .map(|(date, &close)| DailyBar {
                date,
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000.0,
            })
            .collect();
        self.set_bars(symbol, bars);
        self
    }
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn load_stock_data(
        &self,
        symbols: &[String],
        range: &DateRange,
    ) -> Result<PriceTable, MarketDataError> {
        let symbols: Vec<String> = symbols.iter().map(|s| s.to_uppercase()).collect();
        let in_range = {
            let store = match self.bars.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let filtered: HashMap<String, Vec<DailyBar>> = store
                .iter()
                .map(|(symbol, bars)| {
                    let kept = bars
                        .iter()
                        .filter(|b| b.date >= range.start && b.date < range.end)
                        .copied()
                        .collect();
                    (symbol.clone(), kept)
                })
                .collect();
            filtered
        };

        build_history_table(&symbols, &in_range)
    }
}
