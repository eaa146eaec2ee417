//! DuckDB SQL dialect implementation

use super::{LiteralCast, SqlDialect};
use crate::utils::sql::escape_string_literal;

/// DuckDB SQL dialect
pub struct DuckdbDialect;

impl SqlDialect for DuckdbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn json_value(&self, metadata_column: &str, path: &str) -> String {
        format!(
            "json_extract_string({}, '$.{}')",
            self.quote_identifier(metadata_column),
            escape_string_literal(path)
        )
    }

    fn typed_placeholder(&self, cast: LiteralCast) -> String {
        format!("?::{}", sql_type(cast))
    }

    fn cast_selector(&self, selector: &str, cast: Option<LiteralCast>) -> String {
        match cast {
            Some(cast) => format!("TRY_CAST({} AS {})", selector, sql_type(cast)),
            None => selector.to_string(),
        }
    }

    fn text_search(&self, selector: &str, placeholder: &str) -> String {
        format!("contains({}, {})", selector, placeholder)
    }
}

fn sql_type(cast: LiteralCast) -> &'static str {
    match cast {
        LiteralCast::Boolean => "BOOLEAN",
        LiteralCast::Double => "DOUBLE",
        LiteralCast::Date => "DATE",
    }
}
