use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant::{AtrSmoothing, Const, ExtremumKind, SwingError};

/// Parameters of one detector run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingConfig {
    pub index_column: String,
    /// Series the swing points are detected on.
    pub price_column: String,
    /// Series the bookkeeping `_val` columns are copied from. Falls back to
    /// `price_column` when unset.
    pub reference_column: Option<String>,
    pub high_column: String,
    pub low_column: String,
    pub close_column: String,
    pub atr_window: usize,
    pub atr_multiplier: f64,
    pub atr_smoothing: AtrSmoothing,
    /// Kind sought on a series with no flagged extrema. The minimum-first
    /// default is arbitrary.
    pub initial_seek: ExtremumKind,
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            index_column: "Date".to_string(),
            price_column: "Close".to_string(),
            reference_column: None,
            high_column: "High".to_string(),
            low_column: "Low".to_string(),
            close_column: "Close".to_string(),
            atr_window: Const::ATR_SMOOTHING_N,
            atr_multiplier: Const::ATR_MULTIPLIER,
            atr_smoothing: AtrSmoothing::Simple,
            initial_seek: ExtremumKind::Minimum,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwingConfigPatch {
    pub index_column: Option<String>,
    pub price_column: Option<String>,
    pub reference_column: Option<String>,
    pub high_column: Option<String>,
    pub low_column: Option<String>,
    pub close_column: Option<String>,
    pub atr_window: Option<usize>,
    pub atr_multiplier: Option<f64>,
    pub atr_smoothing: Option<AtrSmoothing>,
    pub initial_seek: Option<ExtremumKind>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwingProfileConfig {
    #[serde(default)]
    pub default: SwingConfigPatch,
    #[serde(default)]
    pub symbol: HashMap<String, SwingConfigPatch>,
}

/// Column names the ATR calculator reads.
#[derive(Debug, Clone, Copy)]
pub struct OhlcColumns<'a> {
    pub high: &'a str,
    pub low: &'a str,
    pub close: &'a str,
}

impl SwingConfig {
    pub fn atr_column(&self) -> String {
        Const::atr_column(self.atr_window)
    }

    pub fn reference_column(&self) -> &str {
        self.reference_column
            .as_deref()
            .unwrap_or(self.price_column.as_str())
    }

    pub fn ohlc_columns(&self) -> OhlcColumns<'_> {
        OhlcColumns {
            high: &self.high_column,
            low: &self.low_column,
            close: &self.close_column,
        }
    }

    pub fn with_price_column(mut self, column: impl Into<String>) -> Self {
        self.price_column = column.into();
        self
    }

    pub fn with_atr(mut self, window: usize, multiplier: f64) -> Self {
        self.atr_window = window;
        self.atr_multiplier = multiplier;
        self
    }

    pub fn validate(&self) -> Result<(), SwingError> {
        if self.atr_window == 0 {
            return Err(SwingError::InvalidConfig(
                "atr_window must be > 0".to_string(),
            ));
        }
        if !self.atr_multiplier.is_finite() || self.atr_multiplier < 0.0 {
            return Err(SwingError::InvalidConfig(format!(
                "atr_multiplier must be finite and >= 0, got {}",
                self.atr_multiplier
            )));
        }
        let names = [
            ("index_column", self.index_column.as_str()),
            ("price_column", self.price_column.as_str()),
            ("high_column", self.high_column.as_str()),
            ("low_column", self.low_column.as_str()),
            ("close_column", self.close_column.as_str()),
            ("reference_column", self.reference_column()),
        ];
        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(SwingError::InvalidConfig(format!("{field} is empty")));
            }
        }
        Ok(())
    }

    pub fn apply_patch(mut self, patch: SwingConfigPatch) -> Self {
        if let Some(v) = patch.index_column {
            self.index_column = v;
        }
        if let Some(v) = patch.price_column {
            self.price_column = v;
        }
        if let Some(v) = patch.reference_column {
            self.reference_column = Some(v);
        }
        if let Some(v) = patch.high_column {
            self.high_column = v;
        }
        if let Some(v) = patch.low_column {
            self.low_column = v;
        }
        if let Some(v) = patch.close_column {
            self.close_column = v;
        }

        if let Some(v) = patch.atr_window {
            self.atr_window = v;
        }
        if let Some(v) = patch.atr_multiplier {
            self.atr_multiplier = v;
        }
        if let Some(v) = patch.atr_smoothing {
            self.atr_smoothing = v;
        }
        if let Some(v) = patch.initial_seek {
            self.initial_seek = v;
        }
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SwingError> {
        let patch: SwingConfigPatch = serde_yaml::from_str(yaml)?;
        Ok(Self::default().apply_patch(patch))
    }

    pub fn from_json_str(json: &str) -> Result<Self, SwingError> {
        let patch: SwingConfigPatch = serde_json::from_str(json)?;
        Ok(Self::default().apply_patch(patch))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SwingError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}

impl SwingProfileConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SwingError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SwingError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn resolve_for(&self, symbol: &str) -> SwingConfig {
        let mut config = SwingConfig::default().apply_patch(self.default.clone());
        if let Some(patch) = find_patch(&self.symbol, symbol) {
            config = config.apply_patch(patch.clone());
        }
        config
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a profile from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<SwingProfileConfig, SwingError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|x| x.to_str()) {
            Some("json") => SwingProfileConfig::from_json_str(&text),
            Some("yaml") | Some("yml") => SwingProfileConfig::from_yaml_str(&text),
            _ => Err(SwingError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn normalize_key(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

fn find_patch<'a>(
    map: &'a HashMap<String, SwingConfigPatch>,
    key: &str,
) -> Option<&'a SwingConfigPatch> {
    let key_norm = normalize_key(key);
    map.iter()
        .find(|(k, _)| normalize_key(k) == key_norm)
        .map(|(_, v)| v)
}
