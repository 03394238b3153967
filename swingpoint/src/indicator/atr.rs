use polars::prelude::DataFrame;

use crate::config::OhlcColumns;
use crate::constant::{AtrSmoothing, Const, SwingError};
use crate::frame;

use super::core::Indicator;

/// Average true range over the previous `period` true ranges.
///
/// The true range series is shifted one row before smoothing: a row only sees
/// the range of the bar before it.
#[derive(Debug, Clone)]
pub struct Atr {
    name: String,
    period: usize,
    smoothing: AtrSmoothing,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self::with_smoothing(period, AtrSmoothing::Simple)
    }

    /// # Panics
    ///
    /// Panics if `period` is zero. [`add_atr_column`] checks the window first.
    pub fn with_smoothing(period: usize, smoothing: AtrSmoothing) -> Self {
        assert!(period > 0, "period must be > 0");
        Self {
            name: Const::atr_column(period),
            period,
            smoothing,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    // alpha = 2 / (n + 1), unadjusted; a gap of nulls decays the old mean
    // once per missing row.
    fn exponential_mean(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let alpha = 2.0 / (self.period as f64 + 1.0);
        let mut mean: Option<f64> = None;
        let mut observations = 0usize;
        let mut gap = 0i32;
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match (*value, mean) {
                (Some(x), None) => {
                    mean = Some(x);
                    observations = 1;
                    gap = 0;
                }
                (Some(x), Some(prev)) => {
                    let old_weight = (1.0 - alpha).powi(gap + 1);
                    mean = Some((old_weight * prev + alpha * x) / (old_weight + alpha));
                    observations += 1;
                    gap = 0;
                }
                (None, Some(_)) => gap += 1,
                (None, None) => {}
            }
            out.push(mean.filter(|_| observations >= self.period));
        }
        out
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(
        &self,
        highs: &[Option<f64>],
        lows: &[Option<f64>],
        closes: &[Option<f64>],
    ) -> Vec<Option<f64>> {
        let tr = true_range_shifted(highs, lows, closes);
        match self.smoothing {
            AtrSmoothing::Simple => rolling_mean(&tr, self.period),
            AtrSmoothing::Exponential => self.exponential_mean(&tr),
        }
    }
}

fn true_range(high: Option<f64>, low: Option<f64>, prev_close: Option<f64>) -> Option<f64> {
    [
        high.zip(low).map(|(h, l)| (h - l).abs()),
        high.zip(prev_close).map(|(h, c)| (h - c).abs()),
        low.zip(prev_close).map(|(l, c)| (l - c).abs()),
    ]
    .into_iter()
    .flatten()
    .reduce(f64::max)
}

/// Mean of the last `n` values; null unless all `n` are present.
pub(crate) fn rolling_mean(values: &[Option<f64>], n: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if n == 0 || i + 1 < n {
                return None;
            }
            let window = &values[i + 1 - n..=i];
            let sum = window.iter().copied().sum::<Option<f64>>()?;
            Some(sum / n as f64)
        })
        .collect()
}

/// True range of the previous row, aligned to the current row.
pub fn true_range_shifted(
    highs: &[Option<f64>],
    lows: &[Option<f64>],
    closes: &[Option<f64>],
) -> Vec<Option<f64>> {
    let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();
    let len = highs.len().max(lows.len()).max(closes.len());
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        if i == 0 {
            out.push(None);
            continue;
        }
        let prev = i - 1;
        let prev_close = if prev == 0 { None } else { at(closes, prev - 1) };
        out.push(true_range(at(highs, prev), at(lows, prev), prev_close));
    }
    out
}

/// Returns a copy of `df` with `atr_{window}` and the shifted `tr` column.
pub fn add_atr_column(
    df: &DataFrame,
    window: usize,
    smoothing: AtrSmoothing,
    columns: OhlcColumns<'_>,
) -> Result<DataFrame, SwingError> {
    if window == 0 {
        return Err(SwingError::InvalidConfig("atr window must be > 0".to_string()));
    }
    let atr = Atr::with_smoothing(window, smoothing);
    let highs = frame::f64_values(df, columns.high)?;
    let lows = frame::f64_values(df, columns.low)?;
    let closes = frame::f64_values(df, columns.close)?;

    let mut out = df.clone();
    out.with_column(frame::f64_series(
        atr.name(),
        atr.compute(&highs, &lows, &closes),
    ))?;
    out.with_column(frame::f64_series(
        Const::TR,
        true_range_shifted(&highs, &lows, &closes),
    ))?;
    Ok(out)
}
