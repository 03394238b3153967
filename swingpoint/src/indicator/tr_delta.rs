use polars::prelude::DataFrame;

use crate::config::OhlcColumns;
use crate::constant::{Const, SwingError};
use crate::frame;

use super::atr::{Atr, rolling_mean, true_range_shifted};
use super::core::Indicator;

/// Volatility spike ratio: a short ATR over the long-run mean true range.
///
/// Values well above 1.0 mark bars where range expanded abruptly.
#[derive(Debug, Clone)]
pub struct TrDelta {
    short: Atr,
    baseline_period: usize,
}

impl Default for TrDelta {
    fn default() -> Self {
        Self {
            short: Atr::new(3),
            baseline_period: 100,
        }
    }
}

impl TrDelta {
    pub fn new(short_period: usize, baseline_period: usize) -> Result<Self, SwingError> {
        if short_period == 0 || baseline_period == 0 {
            return Err(SwingError::InvalidConfig(format!(
                "tr_delta periods must be > 0, got {short_period}/{baseline_period}"
            )));
        }
        Ok(Self {
            short: Atr::new(short_period),
            baseline_period,
        })
    }
}

impl Indicator for TrDelta {
    fn name(&self) -> &str {
        Const::TR_DELTA
    }

    fn compute(
        &self,
        highs: &[Option<f64>],
        lows: &[Option<f64>],
        closes: &[Option<f64>],
    ) -> Vec<Option<f64>> {
        let tr = true_range_shifted(highs, lows, closes);
        let baseline = rolling_mean(&tr, self.baseline_period);
        self.short
            .compute(highs, lows, closes)
            .into_iter()
            .zip(baseline)
            .map(|(short, base)| match (short, base) {
                (Some(s), Some(b)) if b != 0.0 => Some(s / b),
                _ => None,
            })
            .collect()
    }
}

/// Returns a copy of `df` with the `tr_delta` column.
pub fn add_tr_delta_column(
    df: &DataFrame,
    indicator: &TrDelta,
    columns: OhlcColumns<'_>,
) -> Result<DataFrame, SwingError> {
    let highs = frame::f64_values(df, columns.high)?;
    let lows = frame::f64_values(df, columns.low)?;
    let closes = frame::f64_values(df, columns.close)?;
    let mut out = df.clone();
    out.with_column(frame::f64_series(
        indicator.name(),
        indicator.compute(&highs, &lows, &closes),
    ))?;
    Ok(out)
}
