//! Runtime Configuration Module
//! Output locations, log file and the low-performance threshold.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Grades strictly below this value are flagged as low performance.
pub const LOW_PERFORMANCE_THRESHOLD: f64 = 70.0;

pub const REPORT_OUTPUT_DIR: &str = "reports";
pub const PLOT_OUTPUT_DIR: &str = "plots";
pub const LOG_FILE: &str = "ucda_app.log";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings shared by every stage of the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub report_dir: PathBuf,
    pub plot_dir: PathBuf,
    pub log_file: PathBuf,
    pub low_performance_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from(REPORT_OUTPUT_DIR),
            plot_dir: PathBuf::from(PLOT_OUTPUT_DIR),
            log_file: PathBuf::from(LOG_FILE),
            low_performance_threshold: LOW_PERFORMANCE_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    /// Load settings from a JSON file. Absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path of the text summary report.
    pub fn report_path(&self) -> PathBuf {
        self.report_dir.join("analysis_report.txt")
    }
}
