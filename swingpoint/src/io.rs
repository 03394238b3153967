use std::fs::File;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::{
    CsvWriter, DataFrame, DataType, NamedFrom, ParquetWriter, SerWriter, Series, TimeUnit,
};
use serde::Deserialize;

use crate::config::SwingConfig;
use crate::constant::SwingError;

#[derive(Debug, Deserialize)]
struct CsvBarRow {
    #[serde(alias = "Date", alias = "date", alias = "Datetime")]
    datetime: String,
    #[serde(alias = "Open", alias = "open")]
    open_price: Option<f64>,
    #[serde(alias = "High", alias = "high")]
    high_price: Option<f64>,
    #[serde(alias = "Low", alias = "low")]
    low_price: Option<f64>,
    #[serde(alias = "Close", alias = "close")]
    close_price: Option<f64>,
    #[serde(default, alias = "Volume", alias = "volume")]
    volume: Option<f64>,
}

/// Loads daily or intraday bars into a frame keyed by a millisecond
/// `Datetime` index named after `config.index_column`.
pub fn read_ohlc_csv(path: impl AsRef<Path>, config: &SwingConfig) -> Result<DataFrame, SwingError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut stamps = Vec::new();
    let mut open = Vec::new();
    let mut high = Vec::new();
    let mut low = Vec::new();
    let mut close = Vec::new();
    let mut volume = Vec::new();
    for row in reader.deserialize::<CsvBarRow>() {
        let row = row?;
        stamps.push(parse_datetime(&row.datetime)?.timestamp_millis());
        open.push(row.open_price);
        high.push(row.high_price);
        low.push(row.low_price);
        close.push(row.close_price);
        volume.push(row.volume);
    }

    let index = Series::new(&config.index_column, stamps)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let df = DataFrame::new(vec![
        index,
        Series::new("Open", open),
        Series::new(&config.high_column, high),
        Series::new(&config.low_column, low),
        Series::new(&config.close_column, close),
        Series::new("Volume", volume),
    ])?;
    Ok(df)
}

pub fn write_parquet(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<(), SwingError> {
    let mut file = File::create(path)?;
    ParquetWriter::new(&mut file).finish(df)?;
    Ok(())
}

pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<(), SwingError> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(df)?;
    Ok(())
}

pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, SwingError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let patterns = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y%m%d%H%M%S%.f",
    ];
    for pattern in patterns {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    for pattern in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Some(dt) = NaiveDate::parse_from_str(value, pattern)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    Err(SwingError::InvalidIndex(format!("invalid datetime: {value}")))
}
