use crate::domain::ports::IndicatorObserver;
use tracing::info;

/// Default observer: one structured `info` event per computed indicator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl IndicatorObserver for TracingObserver {
    fn on_indicator(&self, name: &str, column: &str, window: usize) {
        info!(indicator = name, source = column, window, "Indicator calculated");
    }

    fn on_pipeline_complete(&self, rows: usize) {
        info!(rows, "Technical indicators created");
    }
}
