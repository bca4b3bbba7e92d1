//! Batch technical indicators computed over a whole `PriceTable`.

pub mod engine;
pub mod rolling;

pub use engine::{
    CLOSE_COLUMN, DEFAULT_RSI_WINDOW, IndicatorEngine, LONG_MA_WINDOW, RSI_COLUMN,
    SHORT_MA_WINDOW, moving_average_column,
};
pub use rolling::{rolling_mean, rsi_series};
