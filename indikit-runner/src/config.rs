//! Serializable batch configuration.
//!
//! A batch file is TOML:
//!
//! ```toml
//! parallel = true
//! pad_outputs = false
//!
//! [[study]]
//! label = "fast"
//! indicator = "sma"
//! options = [10]
//! inputs = ["close"]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indikit_core::Registry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content hash of a batch configuration.
pub type Fingerprint = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse batch TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize batch TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("canonicalize batch config: {0}")]
    Canonical(#[from] serde_json::Error),

    #[error("batch has no studies")]
    Empty,

    #[error("study label '{0}' is used more than once")]
    DuplicateLabel(String),

    #[error("study '{label}': unknown indicator '{indicator}'")]
    UnknownIndicator { label: String, indicator: String },
}

/// A set of indicator evaluations over one dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchConfig {
    /// Evaluate studies on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Re-align outputs to the dataset rows with leading NaNs.
    #[serde(default)]
    pub pad_outputs: bool,

    #[serde(default, rename = "study")]
    pub studies: Vec<StudyConfig>,
}

fn default_parallel() -> bool {
    true
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            pad_outputs: false,
            studies: Vec::new(),
        }
    }
}

/// One indicator call: which indicator, its options, and the dataset columns
/// bound to its inputs in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub indicator: String,
    #[serde(default)]
    pub options: Vec<f64>,
    pub inputs: Vec<String>,
}

impl StudyConfig {
    pub fn new(indicator: impl Into<String>, options: &[f64], inputs: &[&str]) -> Self {
        Self {
            label: None,
            indicator: indicator.into(),
            options: options.to_vec(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The explicit label, or the indicator id.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.indicator)
    }
}

impl BatchConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn with_study(mut self, study: StudyConfig) -> Self {
        self.studies.push(study);
        self
    }

    /// Deterministic BLAKE3 hash of the configuration.
    ///
    /// Two configs with identical content share a fingerprint, so reports
    /// can be matched back to the batch that produced them.
    pub fn fingerprint(&self) -> Result<Fingerprint, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    /// Checks the batch against `registry` before anything is evaluated.
    pub fn validate(&self, registry: &Registry) -> Result<(), ConfigError> {
        if self.studies.is_empty() {
            return Err(ConfigError::Empty);
        }
        let mut seen = HashSet::new();
        for study in &self.studies {
            if !seen.insert(study.label()) {
                return Err(ConfigError::DuplicateLabel(study.label().to_string()));
            }
            if !registry.contains(&study.indicator) {
                return Err(ConfigError::UnknownIndicator {
                    label: study.label().to_string(),
                    indicator: study.indicator.clone(),
                });
            }
        }
        Ok(())
    }
}
