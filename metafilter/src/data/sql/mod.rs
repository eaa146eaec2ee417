//! SQL abstraction layer for multi-database support
//!
//! Filter compilation emits the same clause shape for every engine; only
//! identifier quoting, JSON-path extraction, literal casts and the text
//! search predicate differ. Those are rendered through [`SqlDialect`].

mod dialect;
mod duckdb_dialect;
mod hana_dialect;

pub use dialect::{LiteralCast, SqlDialect};
pub use duckdb_dialect::DuckdbDialect;
pub use hana_dialect::HanaDialect;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Database backend identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Hana,
    Duckdb,
}

impl Backend {
    /// Get the SQL dialect for this backend
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Backend::Hana => &HanaDialect,
            Backend::Duckdb => &DuckdbDialect,
        }
    }

    /// Get the backend name
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Hana => "hana",
            Backend::Duckdb => "duckdb",
        }
    }

    /// Parse a backend name (case insensitive)
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "hana" => Ok(Backend::Hana),
            "duckdb" => Ok(Backend::Duckdb),
            _ => Err(format!(
                "Invalid backend '{}'. Valid options: hana, duckdb",
                s
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
