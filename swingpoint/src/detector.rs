use polars::prelude::DataFrame;
use tracing::debug;

use crate::bookkeeping::fill_bookkeeping;
use crate::columns::ensure_swing_columns;
use crate::config::SwingConfig;
use crate::constant::SwingError;
use crate::frame;
use crate::resume::{ResumePoint, ScanCursor, locate_resume_point};
use crate::scanner::{ScanOutcome, scan_extrema};

#[derive(Debug, Clone)]
pub struct SwingRun {
    pub frame: DataFrame,
    pub resume: ResumePoint,
    pub outcome: ScanOutcome,
}

/// Runs column setup, resume lookup, scanning and bookkeeping on one series.
#[derive(Debug, Clone, Default)]
pub struct SwingDetector {
    config: SwingConfig,
}

impl SwingDetector {
    pub fn new(config: SwingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SwingConfig {
        &self.config
    }

    /// Resumes after the last extremum already flagged in `df`.
    pub fn run(&self, df: &DataFrame) -> Result<SwingRun, SwingError> {
        let prepared = ensure_swing_columns(df, &self.config)?;
        let resume = locate_resume_point(&prepared, &self.config)?;
        self.finish(prepared, resume)
    }

    /// Resumes from a persisted cursor instead of the flag columns.
    pub fn run_from_cursor(&self, df: &DataFrame, cursor: ScanCursor) -> Result<SwingRun, SwingError> {
        let prepared = ensure_swing_columns(df, &self.config)?;
        let stamps = frame::timestamps(&prepared, &self.config.index_column)?;
        let resume = cursor.resume_point(&stamps, self.config.initial_seek);
        self.finish(prepared, resume)
    }

    fn finish(&self, prepared: DataFrame, resume: ResumePoint) -> Result<SwingRun, SwingError> {
        debug!(
            rows = prepared.height(),
            start = ?resume.start,
            seek = resume.seek.as_str(),
            "scanning for swing extrema"
        );
        let (scanned, outcome) = scan_extrema(&prepared, resume, &self.config)?;
        let frame = fill_bookkeeping(&scanned, &self.config)?;
        debug!(
            confirmed = outcome.confirmed.len(),
            rows_visited = outcome.rows_visited,
            "swing scan finished"
        );
        Ok(SwingRun {
            frame,
            resume,
            outcome,
        })
    }
}

/// Returns a copy of `df` with the volatility column, `is_min`/`is_max` and
/// the bookkeeping columns filled.
pub fn add_swing_extrema(df: &DataFrame, config: &SwingConfig) -> Result<DataFrame, SwingError> {
    Ok(SwingDetector::new(config.clone()).run(df)?.frame)
}
