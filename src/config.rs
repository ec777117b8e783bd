//! Engine configuration.
//!
//! Read from a small YAML file (`chordsheet.yaml` by default). Every field is optional;
//! an empty file gives the defaults.
//!
//! ```yaml
//! spelling: flats     # auto | sharps | flats
//! notation: stacked   # inline | stacked
//! output: json        # yaml | json
//! ```

use crate::convert::Notation;
use crate::error::ChartError;
use crate::model::Spelling;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "chordsheet.yaml";

/// Structured output format for parsed charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Accidental preference for transposed chords
    #[serde(default)]
    pub spelling: Spelling,
    /// Target layout of `convert` when none is given
    #[serde(default)]
    pub notation: Notation,
    /// Format of `parse` output
    #[serde(default)]
    pub output: OutputFormat,
}

impl EngineConfig {
    /// Load a configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChartError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents).map_err(|e| ChartError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ChartError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load `path` when given, else `chordsheet.yaml` if it exists, else the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ChartError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String, ChartError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
