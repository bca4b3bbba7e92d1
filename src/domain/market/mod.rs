// Market data domain
pub mod date_range;
pub mod history;

pub use date_range::DateRange;
pub use history::{DailyBar, build_history_table};
