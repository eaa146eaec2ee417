//! SAP HANA SQL dialect implementation

use super::{LiteralCast, SqlDialect};
use crate::utils::sql::escape_string_literal;

/// SAP HANA SQL dialect
pub struct HanaDialect;

impl SqlDialect for HanaDialect {
    fn name(&self) -> &'static str {
        "hana"
    }

    fn json_value(&self, metadata_column: &str, path: &str) -> String {
        format!(
            "JSON_VALUE({}, '$.{}')",
            self.quote_identifier(metadata_column),
            escape_string_literal(path)
        )
    }

    fn typed_placeholder(&self, cast: LiteralCast) -> String {
        match cast {
            LiteralCast::Boolean => "TO_BOOLEAN(?)",
            LiteralCast::Double => "TO_DOUBLE(?)",
            LiteralCast::Date => "TO_DATE(?)",
        }
        .to_string()
    }

    fn text_search(&self, selector: &str, placeholder: &str) -> String {
        format!(
            "SCORE({} IN ({} EXACT SEARCH MODE 'text')) > 0",
            placeholder, selector
        )
    }
}
