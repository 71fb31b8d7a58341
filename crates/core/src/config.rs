use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Result count used when neither the command line nor a config file sets one.
pub const DEFAULT_RESULTS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    /// Number of records to report.
    pub results: usize,
    /// Line printed before the reported labels.
    pub header: String,
    /// Print a JSON metrics line on stderr after the run.
    pub emit_metrics: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            results: DEFAULT_RESULTS,
            header: String::from("Results:"),
            emit_metrics: false,
        }
    }
}

impl RunConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
