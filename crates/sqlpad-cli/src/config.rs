use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `<table>.csv` files
    pub data_dir: PathBuf,
    /// When set, tables are fetched from `<base_url>/<table>.csv` instead
    pub base_url: Option<String>,
    pub cache_capacity: usize,
    pub show_timing: bool,
    /// Rows shown in table output; results themselves are not truncated
    pub max_rows: usize,
    pub output_format: OutputFormat,
    pub strict_operators: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => anyhow::bail!("Unknown format '{}'. Use: table, json, or csv", name),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            base_url: None,
            cache_capacity: sqlpad_cache::config::DEFAULT_MAX_ENTRIES,
            show_timing: true,
            max_rows: 1000,
            output_format: OutputFormat::Table,
            strict_operators: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }
}
