//! Bookkeeping filler.
//!
//! For each row, the latest and second-latest flagged minimum and maximum
//! among strictly earlier rows, with the reference price at those rows.
//! Features built on these columns never see a swing point that was not yet
//! known on the row they describe.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::config::SwingConfig;
use crate::constant::{Const, ExtremumKind, SwingError};
use crate::frame;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceMark {
    pub timestamp: i64,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SwingMemory {
    pub last_min: Option<PriceMark>,
    pub prev_min: Option<PriceMark>,
    pub last_max: Option<PriceMark>,
    pub prev_max: Option<PriceMark>,
}

impl SwingMemory {
    pub fn record(&mut self, kind: ExtremumKind, mark: PriceMark) {
        match kind {
            ExtremumKind::Minimum => {
                self.prev_min = self.last_min.replace(mark);
            }
            ExtremumKind::Maximum => {
                self.prev_max = self.last_max.replace(mark);
            }
        }
    }

    pub fn last(&self, kind: ExtremumKind) -> Option<PriceMark> {
        match kind {
            ExtremumKind::Minimum => self.last_min,
            ExtremumKind::Maximum => self.last_max,
        }
    }

    pub fn prev(&self, kind: ExtremumKind) -> Option<PriceMark> {
        match kind {
            ExtremumKind::Minimum => self.prev_min,
            ExtremumKind::Maximum => self.prev_max,
        }
    }
}

/// Memory as seen by each row, before that row's own flag is folded in.
/// Expects strictly increasing timestamps.
pub fn lookback_rows(
    timestamps: &[i64],
    is_min: &[bool],
    is_max: &[bool],
    values: &[Option<f64>],
) -> Result<Vec<SwingMemory>, SwingError> {
    let mut memory = SwingMemory::default();
    let mut out = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        out.push(memory);
        let min = is_min.get(i).copied().unwrap_or(false);
        let max = is_max.get(i).copied().unwrap_or(false);
        let kind = match (min, max) {
            (true, true) => return Err(SwingError::ConflictingExtremum { timestamp }),
            (true, false) => ExtremumKind::Minimum,
            (false, true) => ExtremumKind::Maximum,
            (false, false) => continue,
        };
        let value = values.get(i).copied().flatten();
        memory.record(kind, PriceMark { timestamp, value });
    }
    Ok(out)
}

/// Returns a copy of `df` with the eight `last_known_*`/`prev_known_*`
/// columns recomputed from the current flags.
pub fn fill_bookkeeping(df: &DataFrame, config: &SwingConfig) -> Result<DataFrame, SwingError> {
    let stamps = frame::timestamps(df, &config.index_column)?;
    frame::ensure_sorted_index(&stamps, &config.index_column)?;
    let index_dtype = frame::index_dtype(df, &config.index_column)?;
    let is_min = frame::flag_values(df, Const::IS_MIN)?;
    let is_max = frame::flag_values(df, Const::IS_MAX)?;
    let values = frame::f64_values(df, config.reference_column())?;

    let rows = lookback_rows(&stamps, &is_min, &is_max, &values)?;

    let picks: [(&str, &str, fn(&SwingMemory) -> Option<PriceMark>); 4] = [
        (Const::LAST_KNOWN_MIN_DATE, Const::LAST_KNOWN_MIN_VAL, |m| m.last_min),
        (Const::PREV_KNOWN_MIN_DATE, Const::PREV_KNOWN_MIN_VAL, |m| m.prev_min),
        (Const::LAST_KNOWN_MAX_DATE, Const::LAST_KNOWN_MAX_VAL, |m| m.last_max),
        (Const::PREV_KNOWN_MAX_DATE, Const::PREV_KNOWN_MAX_VAL, |m| m.prev_max),
    ];

    let mut out = df.clone();
    for (date_column, value_column, pick) in picks {
        let marks: Vec<Option<PriceMark>> = rows.iter().map(pick).collect();
        let dates = marks.iter().map(|m| m.map(|x| x.timestamp)).collect();
        let vals = marks.iter().map(|m| m.and_then(|x| x.value)).collect();
        out.with_column(frame::date_series(date_column, dates, &index_dtype)?)?;
        out.with_column(frame::f64_series(value_column, vals))?;
    }
    Ok(out)
}
