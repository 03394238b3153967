//! Extremum scanner.
//!
//! One forward pass keeps a single candidate extremum. A candidate is
//! confirmed once price retraces from it by strictly more than
//! `volatility * multiplier`, using the volatility of the row doing the
//! retracing. The candidate still open at the end of the series is never
//! flagged.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SwingConfig;
use crate::constant::{Const, ExtremumKind, SwingError};
use crate::frame;
use crate::resume::{ExtremumMark, ResumePoint, ScanCursor};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub kind: ExtremumKind,
    pub index: usize,
    pub timestamp: i64,
    pub price: f64,
}

impl SwingPoint {
    pub fn mark(&self) -> ExtremumMark {
        ExtremumMark {
            kind: self.kind,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanRow {
    pub index: usize,
    pub timestamp: i64,
    pub price: Option<f64>,
    pub volatility: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub seek: ExtremumKind,
    /// Best price so far for `seek`; empty until the first priced row.
    pub best: Option<SwingPoint>,
}

impl Candidate {
    pub fn new(seek: ExtremumKind) -> Self {
        Self { seek, best: None }
    }

    /// Advances the state machine by one row. Returns the next candidate and
    /// the extremum confirmed by this row, if any.
    pub fn step(self, row: &ScanRow, multiplier: f64) -> (Self, Option<SwingPoint>) {
        let Some(price) = row.price else {
            return (self, None);
        };
        let here = SwingPoint {
            kind: self.seek,
            index: row.index,
            timestamp: row.timestamp,
            price,
        };
        let Some(best) = self.best else {
            return (Self { best: Some(here), ..self }, None);
        };

        // equal prices extend, so a plateau moves the candidate forward
        let extends = match self.seek {
            ExtremumKind::Maximum => price >= best.price,
            ExtremumKind::Minimum => price <= best.price,
        };
        if extends {
            return (Self { best: Some(here), ..self }, None);
        }

        let retrace = match self.seek {
            ExtremumKind::Maximum => best.price - price,
            ExtremumKind::Minimum => price - best.price,
        };
        let confirmed = row
            .volatility
            .is_some_and(|vol| retrace > vol * multiplier);
        if !confirmed {
            return (self, None);
        }

        let seek = self.seek.opposite();
        let next = Self {
            seek,
            best: Some(SwingPoint { kind: seek, ..here }),
        };
        (next, Some(best))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub confirmed: Vec<SwingPoint>,
    /// Unconfirmed candidate left at the end of the series.
    pub open_candidate: Option<SwingPoint>,
    pub seek: ExtremumKind,
    pub cursor: ScanCursor,
    pub rows_visited: usize,
}

impl ScanOutcome {
    fn idle(seek: ExtremumKind, cursor: ScanCursor) -> Self {
        Self {
            confirmed: Vec::new(),
            open_candidate: None,
            seek,
            cursor,
            rows_visited: 0,
        }
    }
}

pub fn scan_rows<I>(rows: I, seek: ExtremumKind, multiplier: f64, cursor: ScanCursor) -> ScanOutcome
where
    I: IntoIterator<Item = ScanRow>,
{
    let mut outcome = ScanOutcome::idle(seek, cursor);
    let mut candidate = Candidate::new(seek);
    for row in rows {
        outcome.rows_visited += 1;
        let (next, confirmed) = candidate.step(&row, multiplier);
        if let Some(point) = confirmed {
            outcome.cursor.record(point.kind, point.timestamp);
            outcome.confirmed.push(point);
        }
        candidate = next;
    }
    outcome.seek = candidate.seek;
    outcome.open_candidate = candidate.best;
    outcome
}

/// Scans `df` from `resume` and returns a copy with the confirmed extrema
/// flagged.
pub fn scan_extrema(
    df: &DataFrame,
    resume: ResumePoint,
    config: &SwingConfig,
) -> Result<(DataFrame, ScanOutcome), SwingError> {
    config.validate()?;
    let stamps = frame::timestamps(df, &config.index_column)?;
    frame::ensure_sorted_index(&stamps, &config.index_column)?;
    let mut is_min = frame::flag_values(df, Const::IS_MIN)?;
    let mut is_max = frame::flag_values(df, Const::IS_MAX)?;
    let cursor = ScanCursor::from_flags(&stamps, &is_min, &is_max)?;

    let Some(start) = resume.start else {
        return Ok((df.clone(), ScanOutcome::idle(resume.seek, cursor)));
    };

    let prices = frame::f64_values(df, &config.price_column)?;
    let volatility = frame::f64_values(df, &config.atr_column())?;
    let first = stamps.partition_point(|t| *t < start);
    let rows = (first..stamps.len()).map(|i| ScanRow {
        index: i,
        timestamp: stamps[i],
        price: prices[i],
        volatility: volatility[i],
    });
    let outcome = scan_rows(rows, resume.seek, config.atr_multiplier, cursor);

    for point in &outcome.confirmed {
        let (flags, opposite) = match point.kind {
            ExtremumKind::Minimum => (&mut is_min, &is_max),
            ExtremumKind::Maximum => (&mut is_max, &is_min),
        };
        if opposite[point.index] {
            return Err(SwingError::ConflictingExtremum {
                timestamp: point.timestamp,
            });
        }
        flags[point.index] = true;
        debug!(
            kind = point.kind.as_str(),
            timestamp = point.timestamp,
            price = point.price,
            "swing extremum confirmed"
        );
    }

    let mut out = df.clone();
    out.with_column(frame::flag_series(Const::IS_MIN, is_min))?;
    out.with_column(frame::flag_series(Const::IS_MAX, is_max))?;
    Ok((out, outcome))
}
