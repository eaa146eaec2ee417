//! SQL dialect trait for filter rendering
//!
//! This trait defines the engine-specific pieces of a compiled filter clause.

use crate::utils::sql::quote_identifier;

/// Typed cast applied to a bound parameter
///
/// Parameters are always bound as strings; the cast tells the engine how
/// to compare them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralCast {
    Boolean,
    Double,
    Date,
}

/// SQL dialect trait for generating database-specific filter SQL
///
/// Every dialect uses `?` as its only placeholder form.
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Quote a dedicated column name
    fn quote_identifier(&self, name: &str) -> String {
        quote_identifier(name)
    }

    /// Extract a generic metadata property from the JSON column
    ///
    /// `path` is a validated `$.`-relative key such as `author` or `doc.lang`.
    ///
    /// - HANA: `JSON_VALUE("META", '$.author')`
    /// - DuckDB: `json_extract_string("META", '$.author')`
    fn json_value(&self, metadata_column: &str, path: &str) -> String;

    /// Wrap a placeholder in a typed cast
    ///
    /// - HANA: `TO_BOOLEAN(?)`, `TO_DOUBLE(?)`, `TO_DATE(?)`
    /// - DuckDB: `?::BOOLEAN`, `?::DOUBLE`, `?::DATE`
    fn typed_placeholder(&self, cast: LiteralCast) -> String;

    /// Adapt a selector to the cast of the literal it is compared with
    ///
    /// Engines that compare JSON text with typed values implicitly keep the
    /// selector as is; stricter engines convert it.
    ///
    /// - HANA: unchanged
    /// - DuckDB: `TRY_CAST(<selector> AS DOUBLE)`
    fn cast_selector(&self, selector: &str, _cast: Option<LiteralCast>) -> String {
        selector.to_string()
    }

    /// Full-text containment predicate for the `$contains` operator
    ///
    /// - HANA: `SCORE(? IN ("text" EXACT SEARCH MODE 'text')) > 0`
    /// - DuckDB: `contains("text", ?)`
    fn text_search(&self, selector: &str, placeholder: &str) -> String;
}
