//! Assembly of per-symbol daily bars into one date-aligned `PriceTable`.

use crate::domain::errors::MarketDataError;
use crate::domain::price_table::PriceTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const PRICE_FIELDS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl DailyBar {
    fn field(&self, name: &str) -> f64 {
        match name {
            "Open" => self.open,
            "High" => self.high,
            "Low" => self.low,
            "Close" => self.close,
            _ => self.volume,
        }
    }
}

/// Column name for `field` of `symbol`. A single-symbol table uses bare names.
pub fn history_column(field: &str, symbol: &str, single: bool) -> String {
    if single {
        field.to_string()
    } else {
        format!("{}_{}", field, symbol)
    }
}

/// Outer-joins the bars of `symbols` on date, then drops every row holding a
/// missing value. Rows come out in ascending date order.
pub fn build_history_table(
    symbols: &[String],
    bars: &HashMap<String, Vec<DailyBar>>,
) -> Result<PriceTable, MarketDataError> {
    if symbols.is_empty() {
        return Err(MarketDataError::InvalidArgument {
            reason: "at least one ticker symbol is required".to_string(),
        });
    }

    let mut by_date: BTreeMap<NaiveDate, HashMap<&str, &DailyBar>> = BTreeMap::new();
    for symbol in symbols {
        for bar in bars.get(symbol).into_iter().flatten() {
            by_date
                .entry(bar.date)
                .or_default()
                .insert(symbol.as_str(), bar);
        }
    }

    let index = by_date.keys().map(|d| d.to_string()).collect();
    let mut table = PriceTable::with_index(index);
    let single = symbols.len() == 1;

    for field in PRICE_FIELDS {
        for symbol in symbols {
            let values = by_date
                .values()
                .map(|row| row.get(symbol.as_str()).map(|bar| bar.field(field)))
                .collect();
            table.insert_column(history_column(field, symbol, single), values)?;
        }
    }

    table.drop_missing_rows();
    Ok(table)
}
