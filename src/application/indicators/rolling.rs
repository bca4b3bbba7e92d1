//! Trailing-window series transforms.
//!
//! A window is only evaluated once it holds `window` consecutive present
//! values; any missing (or NaN) input inside the window yields `None`.

use crate::domain::errors::IndicatorError;
use ta::indicators::SimpleMovingAverage;
use ta::{Next, Reset};

fn validate_window(window: usize) -> Result<(), IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidArgument {
            reason: "window must be a positive number of periods".to_string(),
        });
    }
    Ok(())
}

/// Trailing simple moving average of `values` over `window` periods.
///
/// The first `window - 1` cells are `None` (insufficient history).
pub fn rolling_mean(
    values: &[Option<f64>],
    window: usize,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    validate_window(window)?;
    let mut sma =
        SimpleMovingAverage::new(window).map_err(|e| IndicatorError::InvalidArgument {
            reason: format!("{:?}", e),
        })?;

    let mut run = 0usize;
    let mut repeats = 0usize;
    let mut last = f64::NAN;
    let means = values
        .iter()
        .map(|value| match value {
            Some(x) if !x.is_nan() => {
                run += 1;
                repeats = if *x == last { repeats + 1 } else { 1 };
                last = *x;
                let mean = sma.next(*x);
                // The running sum drifts; a constant window averages to that constant exactly
                let mean = if repeats >= window { *x } else { mean };
                (run >= window).then_some(mean)
            }
            _ => {
                // Gap: restart the window after the missing cell
                run = 0;
                repeats = 0;
                last = f64::NAN;
                sma.reset();
                None
            }
        })
        .collect();

    Ok(means)
}

/// Relative Strength Index from trailing simple averages of gains and losses.
///
/// The first period-over-period difference is undefined and counts as neither
/// gain nor loss, so values start at row `window - 1`. A window with no gains
/// and no losses produces `Some(NaN)`; a window with gains but no losses
/// produces 100.
pub fn rsi_series(
    values: &[Option<f64>],
    window: usize,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    validate_window(window)?;

    let mut gains = Vec::with_capacity(values.len());
    let mut losses = Vec::with_capacity(values.len());
    for (i, current) in values.iter().enumerate() {
        let previous = i.checked_sub(1).and_then(|p| values[p]);
        let delta = match (previous, current) {
            (Some(prev), Some(cur)) => cur - prev,
            _ => f64::NAN,
        };
        gains.push(Some(if delta > 0.0 { delta } else { 0.0 }));
        losses.push(Some(if delta < 0.0 { -delta } else { 0.0 }));
    }

    let avg_gain = rolling_mean(&gains, window)?;
    let avg_loss = rolling_mean(&losses, window)?;

    let rsi = avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => {
                let rs = gain / loss;
                Some(100.0 - 100.0 / (1.0 + rs))
            }
            _ => None,
        })
        .collect();

    Ok(rsi)
}
