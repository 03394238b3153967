//! Column access helpers between polars frames and the typed passes.
//!
//! Every pass reads the columns it needs into plain vectors, works on slices
//! and writes whole columns back with `with_column`.

use polars::prelude::{DataFrame, DataType, NamedFrom, Series};

use crate::constant::SwingError;

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().contains(&name)
}

pub(crate) fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series, SwingError> {
    df.column(name)
        .map_err(|_| SwingError::MissingColumn(name.to_string()))
}

/// Numeric column as `f64`; NaN cells read as null.
pub(crate) fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, SwingError> {
    let series = column(df, name)?.cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

pub(crate) fn bool_values(df: &DataFrame, name: &str) -> Result<Vec<Option<bool>>, SwingError> {
    let series = column(df, name)?.cast(&DataType::Boolean)?;
    Ok(series.bool()?.into_iter().collect())
}

/// Boolean flags with nulls read as `false`.
pub(crate) fn flag_values(df: &DataFrame, name: &str) -> Result<Vec<bool>, SwingError> {
    Ok(bool_values(df, name)?
        .into_iter()
        .map(|v| v.unwrap_or(false))
        .collect())
}

/// The index column as its physical `i64` representation.
pub(crate) fn timestamps(df: &DataFrame, name: &str) -> Result<Vec<i64>, SwingError> {
    let series = column(df, name)?.cast(&DataType::Int64)?;
    series
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| SwingError::InvalidIndex(format!("null {name} at row {row}")))
        })
        .collect()
}

pub(crate) fn index_dtype(df: &DataFrame, name: &str) -> Result<DataType, SwingError> {
    Ok(column(df, name)?.dtype().clone())
}

/// Fails unless timestamps are strictly increasing.
pub(crate) fn ensure_sorted_index(timestamps: &[i64], name: &str) -> Result<(), SwingError> {
    for (row, pair) in timestamps.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(SwingError::InvalidIndex(format!(
                "{name} not strictly increasing at row {}",
                row + 1
            )));
        }
    }
    Ok(())
}

pub(crate) fn f64_series(name: &str, values: Vec<Option<f64>>) -> Series {
    Series::new(name, values)
}

pub(crate) fn flag_series(name: &str, values: Vec<bool>) -> Series {
    Series::new(name, values)
}

/// Timestamps written back with the dtype of the index column.
pub(crate) fn date_series(
    name: &str,
    values: Vec<Option<i64>>,
    dtype: &DataType,
) -> Result<Series, SwingError> {
    let series = Series::new(name, values);
    if series.dtype() == dtype {
        return Ok(series);
    }
    Ok(series.cast(dtype)?)
}

pub(crate) fn null_series(name: &str, len: usize, dtype: &DataType) -> Series {
    Series::full_null(name, len, dtype)
}
