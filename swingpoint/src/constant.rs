use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtremumKind {
    #[serde(rename = "min", alias = "minimum")]
    Minimum,
    #[serde(rename = "max", alias = "maximum")]
    Maximum,
}

impl ExtremumKind {
    pub fn opposite(self) -> Self {
        match self {
            Self::Minimum => Self::Maximum,
            Self::Maximum => Self::Minimum,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimum => "min",
            Self::Maximum => "max",
        }
    }

    pub fn parse(value: &str) -> Result<Self, SwingError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "min" | "minimum" => Ok(Self::Minimum),
            "max" | "maximum" => Ok(Self::Maximum),
            _ => Err(SwingError::InvalidConfig(format!(
                "unknown extremum kind: {value}"
            ))),
        }
    }

    /// Name of the boolean flag column marking this kind.
    pub fn flag_column(self) -> &'static str {
        match self {
            Self::Minimum => Const::IS_MIN,
            Self::Maximum => Const::IS_MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtrSmoothing {
    #[default]
    Simple,
    Exponential,
}

pub struct Const;

impl Const {
    pub const ATR_SMOOTHING_N: usize = 14;
    pub const ATR_MULTIPLIER: f64 = 2.5;

    pub const IS_MIN: &'static str = "is_min";
    pub const IS_MAX: &'static str = "is_max";
    pub const TR: &'static str = "tr";
    pub const TR_DELTA: &'static str = "tr_delta";

    pub const LAST_KNOWN_MIN_DATE: &'static str = "last_known_min_date";
    pub const PREV_KNOWN_MIN_DATE: &'static str = "prev_known_min_date";
    pub const LAST_KNOWN_MAX_DATE: &'static str = "last_known_max_date";
    pub const PREV_KNOWN_MAX_DATE: &'static str = "prev_known_max_date";
    pub const LAST_KNOWN_MIN_VAL: &'static str = "last_known_min_val";
    pub const PREV_KNOWN_MIN_VAL: &'static str = "prev_known_min_val";
    pub const LAST_KNOWN_MAX_VAL: &'static str = "last_known_max_val";
    pub const PREV_KNOWN_MAX_VAL: &'static str = "prev_known_max_val";

    pub const DATE_COLUMNS: [&'static str; 4] = [
        Self::LAST_KNOWN_MIN_DATE,
        Self::PREV_KNOWN_MIN_DATE,
        Self::LAST_KNOWN_MAX_DATE,
        Self::PREV_KNOWN_MAX_DATE,
    ];

    pub const VALUE_COLUMNS: [&'static str; 4] = [
        Self::LAST_KNOWN_MIN_VAL,
        Self::PREV_KNOWN_MIN_VAL,
        Self::LAST_KNOWN_MAX_VAL,
        Self::PREV_KNOWN_MAX_VAL,
    ];

    pub fn atr_column(window: usize) -> String {
        format!("atr_{window}")
    }
}

#[derive(Debug)]
pub enum SwingError {
    MissingColumn(String),
    InvalidIndex(String),
    ConflictingExtremum { timestamp: i64 },
    InvalidConfig(String),
    UnsupportedFormat(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Polars(polars::error::PolarsError),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
}

impl Display for SwingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn(v) => write!(f, "missing column: {v}"),
            Self::InvalidIndex(v) => write!(f, "invalid index: {v}"),
            Self::ConflictingExtremum { timestamp } => {
                write!(f, "row {timestamp} is flagged both is_min and is_max")
            }
            Self::InvalidConfig(v) => write!(f, "invalid config: {v}"),
            Self::UnsupportedFormat(v) => write!(f, "unsupported file format: {v}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Polars(e) => write!(f, "polars error: {e}"),
            Self::Yaml(e) => write!(f, "yaml error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for SwingError {}

impl From<std::io::Error> for SwingError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for SwingError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<polars::error::PolarsError> for SwingError {
    fn from(value: polars::error::PolarsError) -> Self {
        Self::Polars(value)
    }
}

impl From<serde_yaml::Error> for SwingError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<serde_json::Error> for SwingError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
