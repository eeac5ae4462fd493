use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Spreadsheet of student records (.xlsx, .xls, .ods, .csv, .json, .parquet)
    pub data: Option<PathBuf>,

    /// JSON settings file (default: ./dashboard.json if present)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub title: String,
    pub histogram_bins: usize,
    pub boxplot_columns: usize,
    pub kde_gridsize: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("ml_foundations_augmented_from_sample_846.xlsx"),
            title: "ML Foundations Dashboard".to_string(),
            histogram_bins: 20,
            boxplot_columns: 6,
            kde_gridsize: 200,
        }
    }
}

impl DashboardConfig {
    /// Parse a JSON settings file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then the config file, then the positional data path.
    ///
    /// An explicit `--config` must exist; the implicit `dashboard.json` is
    /// only read when present.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => {
                log::info!("using config file {}", path.display());
                Self::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                log::info!("using config file {DEFAULT_CONFIG_FILE}");
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                log::info!("no config file, using defaults");
                Self::default()
            }
        };

        if let Some(data) = &cli.data {
            config.data_path = data.clone();
        }
        Ok(config)
    }
}
