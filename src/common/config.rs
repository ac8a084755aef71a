//! Configuration loading for the command-line front end.

use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_decimals() -> usize {
    2
}

/// Optional settings read from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Log level for this crate (e.g. "info", "debug").
    #[serde(default)]
    pub log_level: Option<String>,
    /// Decimal places for averages and percentages in text reports.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    /// Seed for random station selection when none is given on the command line.
    #[serde(default)]
    pub station_seed: Option<u64>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            decimals: default_decimals(),
            station_seed: None,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the config.toml file
    ///
    /// # Returns
    /// * `Ok(AnalyzerConfig)` if the file was successfully loaded and parsed
    /// * `Err(String)` with a descriptive error message otherwise
    pub fn load(config_path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(config_path).map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load the config beside the dataset if present, defaults otherwise.
    pub fn load_or_default(config_path: &Path) -> Result<Self, String> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Derive the config path from a dataset file path.
    ///
    /// Replaces the dataset filename with "config.toml" in the same directory.
    pub fn config_path_from_dataset(dataset_path: &str) -> PathBuf {
        let dataset = Path::new(dataset_path);
        dataset.parent().unwrap_or(Path::new(".")).join("config.toml")
    }

    /// Parsed log level, if one is configured.
    pub fn level_filter(&self) -> Result<Option<LevelFilter>, String> {
        self.log_level
            .as_deref()
            .map(|level| level.parse::<LevelFilter>().map_err(|_| format!("Unknown log level '{}'", level)))
            .transpose()
    }
}
