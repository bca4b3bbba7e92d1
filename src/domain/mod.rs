// Market data domain
pub mod market;

// Port interfaces
pub mod ports;

// Ordered table of price observations
pub mod price_table;

// Domain-specific error types
pub mod errors;
