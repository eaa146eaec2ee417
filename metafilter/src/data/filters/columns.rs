//! Column resolution
//!
//! Dedicated columns are addressed by quoted identifier; every other key is
//! read from the shared JSON metadata column by path.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::config::FilterConfig;
use crate::data::error::FilterError;
use crate::data::sql::Backend;

/// Generic keys are interpolated into a JSON path literal, so only plain
/// identifier segments are accepted.
static JSON_PATH_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").expect("Invalid regex")
});

/// Maps property keys to SQL selector expressions
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    backend: Backend,
    metadata_column: String,
    specific_columns: HashSet<String>,
}

impl ColumnResolver {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            backend: config.backend,
            metadata_column: config.metadata_column.clone(),
            specific_columns: config.specific_columns.iter().cloned().collect(),
        }
    }

    /// Whether the key has a dedicated column
    pub fn is_specific(&self, key: &str) -> bool {
        self.specific_columns.contains(key)
    }

    /// Resolve a property key to its selector expression
    pub fn resolve(&self, key: &str) -> Result<String, FilterError> {
        let dialect = self.backend.dialect();
        if self.is_specific(key) {
            return Ok(dialect.quote_identifier(key));
        }
        if !JSON_PATH_KEY.is_match(key) {
            return Err(FilterError::InvalidPropertyKey {
                key: key.to_string(),
            });
        }
        Ok(dialect.json_value(&self.metadata_column, key))
    }
}
