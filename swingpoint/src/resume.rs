//! Resume-point locator.
//!
//! Where a scan (re)starts is derived from the last confirmed extremum. The
//! [`ScanCursor`] carries that extremum explicitly so it can be persisted
//! between runs instead of being re-read from the flag columns.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::config::SwingConfig;
use crate::constant::{Const, ExtremumKind, SwingError};
use crate::frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtremumMark {
    pub kind: ExtremumKind,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanCursor {
    pub last_extremum: Option<ExtremumMark>,
}

/// First row to scan and the kind sought there. `start` is `None` when no row
/// is left after the last confirmed extremum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePoint {
    pub start: Option<i64>,
    pub seek: ExtremumKind,
}

impl ScanCursor {
    pub fn cold() -> Self {
        Self::default()
    }

    pub fn after(kind: ExtremumKind, timestamp: i64) -> Self {
        Self {
            last_extremum: Some(ExtremumMark { kind, timestamp }),
        }
    }

    /// Latest flagged row; rows flagged both ways are rejected.
    pub fn from_flags(
        timestamps: &[i64],
        is_min: &[bool],
        is_max: &[bool],
    ) -> Result<Self, SwingError> {
        let mut last: Option<ExtremumMark> = None;
        for (i, &timestamp) in timestamps.iter().enumerate() {
            let min = is_min.get(i).copied().unwrap_or(false);
            let max = is_max.get(i).copied().unwrap_or(false);
            let kind = match (min, max) {
                (true, true) => return Err(SwingError::ConflictingExtremum { timestamp }),
                (true, false) => ExtremumKind::Minimum,
                (false, true) => ExtremumKind::Maximum,
                (false, false) => continue,
            };
            if last.is_none_or(|m| timestamp > m.timestamp) {
                last = Some(ExtremumMark { kind, timestamp });
            }
        }
        Ok(Self {
            last_extremum: last,
        })
    }

    pub fn record(&mut self, kind: ExtremumKind, timestamp: i64) {
        self.last_extremum = Some(ExtremumMark { kind, timestamp });
    }

    pub fn resume_point(&self, timestamps: &[i64], initial_seek: ExtremumKind) -> ResumePoint {
        match self.last_extremum {
            None => ResumePoint {
                start: timestamps.iter().copied().min(),
                seek: initial_seek,
            },
            Some(mark) => ResumePoint {
                start: timestamps
                    .iter()
                    .copied()
                    .filter(|t| *t > mark.timestamp)
                    .min(),
                seek: mark.kind.opposite(),
            },
        }
    }
}

/// Reads the flag columns of `df` and returns where scanning resumes.
///
/// Fails with [`SwingError::MissingColumn`] when `is_min`, `is_max` or the
/// index column is absent.
pub fn locate_resume_point(df: &DataFrame, config: &SwingConfig) -> Result<ResumePoint, SwingError> {
    let is_min = frame::flag_values(df, Const::IS_MIN)?;
    let is_max = frame::flag_values(df, Const::IS_MAX)?;
    let stamps = frame::timestamps(df, &config.index_column)?;
    let cursor = ScanCursor::from_flags(&stamps, &is_min, &is_max)?;
    Ok(cursor.resume_point(&stamps, config.initial_seek))
}
