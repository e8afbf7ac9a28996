//! Engine configuration
//!
//! Typically loaded from a JSON file:
//!
//! ```json
//! {
//!   "top_n": 5,
//!   "ranking": "preserve",
//!   "segment_labels": { "campo_a": "Valor total", "campo_b": "Saques" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::normalize::ranking::{RankingPolicy, DEFAULT_TOP_N};

/// Display labels for generically named segment fields, keyed by field name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentLabels(HashMap<String, String>);

impl SegmentLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, label: impl Into<String>) {
        self.0.insert(field.into(), label.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Label for a field, falling back to the upper-cased field name
    pub fn label_for(&self, field: &str) -> String {
        match self.get(field).map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => field.to_uppercase(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for SegmentLabels {
    fn from(labels: HashMap<String, String>) -> Self {
        Self(labels)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SegmentLabels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Settings for building and ranking normalized statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum entries kept in each ranked counterparty list
    pub top_n: usize,
    /// Whether ranked lists trust source order or are sorted by amount
    pub ranking: RankingPolicy,
    /// Labels for the generic segment fields
    pub segment_labels: SegmentLabels,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            ranking: RankingPolicy::Preserve,
            segment_labels: SegmentLabels::new(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::debug!(
            "Loaded engine config from {} ({} segment labels)",
            path.display(),
            config.segment_labels.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid(
                "top_n must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_segment_label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.segment_labels.insert(field, label);
        self
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
