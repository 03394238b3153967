pub mod bookkeeping;
pub mod columns;
pub mod config;
pub mod constant;
pub mod detector;
mod frame;
pub mod indicator;
pub mod io;
pub mod logging;
pub mod resume;
pub mod scanner;

pub use bookkeeping::{PriceMark, SwingMemory, fill_bookkeeping, lookback_rows};
pub use columns::ensure_swing_columns;
pub use config::{ConfigLoader, OhlcColumns, SwingConfig, SwingConfigPatch, SwingProfileConfig};
pub use constant::{AtrSmoothing, Const, ExtremumKind, SwingError};
pub use detector::{SwingDetector, SwingRun, add_swing_extrema};
pub use indicator::{Atr, Indicator, TrDelta, add_atr_column, add_tr_delta_column};
pub use logging::init_logging;
pub use resume::{ExtremumMark, ResumePoint, ScanCursor, locate_resume_point};
pub use scanner::{Candidate, ScanOutcome, ScanRow, SwingPoint, scan_extrema, scan_rows};
