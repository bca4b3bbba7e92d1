pub mod alpaca;
pub mod core;
pub mod csv_loader;
pub mod mock;
pub mod observability;
pub mod storage;

pub use alpaca::AlpacaMarketDataService;
pub use mock::MockMarketDataService;
