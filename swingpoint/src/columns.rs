//! Column initializer.
//!
//! Makes sure a frame carries the volatility column, the `is_min`/`is_max`
//! flags and the eight bookkeeping columns before detection runs. Present
//! values are kept; only absent columns and empty cells get defaults.

use polars::prelude::{DataFrame, DataType};
use tracing::{debug, warn};

use crate::config::SwingConfig;
use crate::constant::{Const, SwingError};
use crate::frame;
use crate::indicator::{Atr, Indicator, add_atr_column, true_range_shifted};

pub fn ensure_swing_columns(df: &DataFrame, config: &SwingConfig) -> Result<DataFrame, SwingError> {
    config.validate()?;
    let stamps = frame::timestamps(df, &config.index_column)?;
    frame::ensure_sorted_index(&stamps, &config.index_column)?;
    let index_dtype = frame::index_dtype(df, &config.index_column)?;

    let mut out = df.clone();
    ensure_volatility(&mut out, config)?;

    let height = out.height();
    for name in [Const::IS_MIN, Const::IS_MAX] {
        let flags = if frame::has_column(&out, name) {
            frame::flag_values(&out, name)?
        } else {
            vec![false; height]
        };
        out.with_column(frame::flag_series(name, flags))?;
    }

    for name in Const::DATE_COLUMNS {
        if !frame::has_column(&out, name) {
            out.with_column(frame::null_series(name, height, &index_dtype))?;
        }
    }
    for name in Const::VALUE_COLUMNS {
        if !frame::has_column(&out, name) {
            out.with_column(frame::null_series(name, height, &DataType::Float64))?;
        }
    }

    Ok(out)
}

fn ensure_volatility(df: &mut DataFrame, config: &SwingConfig) -> Result<(), SwingError> {
    let name = config.atr_column();
    if !frame::has_column(df, &name) {
        debug!(column = %name, rows = df.height(), "adding volatility column");
        *df = add_atr_column(df, config.atr_window, config.atr_smoothing, config.ohlc_columns())?;
        return Ok(());
    }

    let existing = frame::f64_values(df, &name)?;
    // the first tr cell has no previous bar and stays empty
    let existing_tr = if frame::has_column(df, Const::TR) {
        Some(frame::f64_values(df, Const::TR)?)
    } else {
        None
    };
    let tr_gaps = existing_tr
        .as_ref()
        .is_some_and(|tr| tr.iter().skip(1).any(Option::is_none));
    if existing.iter().all(Option::is_some) && !tr_gaps {
        return Ok(());
    }

    let columns = config.ohlc_columns();
    let has_ohlc = [columns.high, columns.low, columns.close]
        .into_iter()
        .all(|c| frame::has_column(df, c));
    if !has_ohlc {
        warn!(column = %name, "volatility column has empty cells and no OHLC columns to fill them");
        return Ok(());
    }

    let highs = frame::f64_values(df, columns.high)?;
    let lows = frame::f64_values(df, columns.low)?;
    let closes = frame::f64_values(df, columns.close)?;
    let fresh = Atr::with_smoothing(config.atr_window, config.atr_smoothing)
        .compute(&highs, &lows, &closes);
    df.with_column(frame::f64_series(&name, fill_gaps(existing, fresh)))?;

    if let Some(tr) = existing_tr {
        let fresh_tr = true_range_shifted(&highs, &lows, &closes);
        df.with_column(frame::f64_series(Const::TR, fill_gaps(tr, fresh_tr)))?;
    }
    Ok(())
}

fn fill_gaps(existing: Vec<Option<f64>>, fresh: Vec<Option<f64>>) -> Vec<Option<f64>> {
    existing
        .into_iter()
        .zip(fresh)
        .map(|(old, new)| old.or(new))
        .collect()
}
