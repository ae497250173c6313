//! Configuration file handling.
//!
//! Settings come from `hotel-dashboard.toml` (or `--config`), then command
//! line arguments override them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::data::export::DEFAULT_EXPORT_NAME;
use crate::data::loader::LoadOptions;

pub const DEFAULT_CONFIG_FILE: &str = "hotel-dashboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the bookings come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Single character; `\t` for tab. Unset means "by file extension".
    #[serde(default)]
    pub delimiter: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            delimiter: None,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("hotels.csv")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Bars in the ADR-per-country chart.
    #[serde(default = "default_top_countries")]
    pub top_countries: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_countries: default_top_countries(),
        }
    }
}

fn default_top_countries() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_export_name(),
        }
    }
}

fn default_export_name() -> String {
    DEFAULT_EXPORT_NAME.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Image shown at the top of the sidebar.
    #[serde(default)]
    pub logo: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the configuration for this run.
    ///
    /// An explicit `--config` must exist; the default file is optional.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.merge_with_args(args);
        config.validate()?;
        Ok(config)
    }

    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(path) = &args.data {
            self.data.path = path.clone();
        }
        if let Some(delimiter) = &args.delimiter {
            self.data.delimiter = Some(delimiter.clone());
        }
        if let Some(top) = args.top {
            self.dashboard.top_countries = top;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.dashboard.top_countries == 0 {
            bail!("dashboard.top_countries must be at least 1");
        }
        if self.export.file_name.trim().is_empty() {
            bail!("export.file_name must not be empty");
        }
        self.load_options()?;
        Ok(())
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        let delimiter = self
            .data
            .delimiter
            .as_deref()
            .map(parse_delimiter)
            .transpose()?;
        Ok(LoadOptions { delimiter })
    }
}

fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\\t" | "\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => bail!("delimiter must be a single ASCII character, got {s:?}"),
    }
}
