//! Observability adapters for the indicator engine.
//!
//! Events are emitted through `tracing`; the binary decides where they end up
//! by installing a subscriber.

pub mod tracing_observer;

pub use tracing_observer::TracingObserver;
