use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::cli::CliConfig;
use super::constants::{CONFIG_FILE_NAME, DEFAULT_METADATA_COLUMN};
use crate::data::error::FilterError;
use crate::data::sql::Backend;

// =============================================================================
// Compiler Configuration
// =============================================================================

/// Column layout the compiler is bound to
///
/// Captured once when a [`crate::data::filters::WhereClauseBuilder`] is created
/// and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Target SQL dialect
    pub backend: Backend,
    /// JSON-valued column holding all generic metadata
    pub metadata_column: String,
    /// Property keys backed by dedicated columns
    pub specific_columns: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            metadata_column: DEFAULT_METADATA_COLUMN.to_string(),
            specific_columns: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Validate column names
    ///
    /// Names must be non-empty and free of `?`, which would break the
    /// placeholder count of compiled clauses.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.metadata_column.trim().is_empty() {
            return Err(FilterError::Config(
                "metadata_column must not be empty".to_string(),
            ));
        }
        if self.metadata_column.contains('?') {
            return Err(FilterError::Config(format!(
                "metadata_column must not contain '?': {}",
                self.metadata_column
            )));
        }
        for column in &self.specific_columns {
            if column.trim().is_empty() {
                return Err(FilterError::Config(
                    "specific_columns must not contain empty names".to_string(),
                ));
            }
            if column.contains('?') {
                return Err(FilterError::Config(format!(
                    "specific column must not contain '?': {}",
                    column
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// File Configuration
// =============================================================================

/// Compiler configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FilterFileConfig {
    pub backend: Option<Backend>,
    pub metadata_column: Option<String>,
    pub specific_columns: Option<Vec<String>>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub filter: Option<FilterFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub filter: FilterConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Local directory config OR CLI-specified config path
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let config_path = match &cli.config {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.clone())
            }
            None => {
                let local = PathBuf::from(CONFIG_FILE_NAME);
                if local.exists() { Some(local) } else { None }
            }
        };

        let file_config = match config_path {
            Some(path) => {
                let file_config = FileConfig::load_from_file(&path)?;
                file_config.warn_unknown_fields();
                file_config
            }
            None => FileConfig::default(),
        };

        let config = Self::layer(file_config, cli);
        config.validate()?;
        tracing::debug!(
            backend = %config.filter.backend,
            metadata_column = %config.filter.metadata_column,
            specific_columns = config.filter.specific_columns.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn layer(file_config: FileConfig, cli: &CliConfig) -> Self {
        let defaults = FilterConfig::default();
        let file_filter = file_config.filter.unwrap_or_default();

        let backend = cli
            .backend
            .or(file_filter.backend)
            .unwrap_or(defaults.backend);
        let metadata_column = cli
            .metadata_column
            .clone()
            .or(file_filter.metadata_column)
            .unwrap_or(defaults.metadata_column);
        let specific_columns = cli
            .specific_columns
            .clone()
            .or(file_filter.specific_columns)
            .unwrap_or(defaults.specific_columns);

        Self {
            filter: FilterConfig {
                backend,
                metadata_column,
                specific_columns,
            },
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        self.filter
            .validate()
            .context("Invalid filter configuration")
    }
}
