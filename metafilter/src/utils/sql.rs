//! SQL utility functions

/// Quote an identifier with double quotes, doubling embedded quotes
///
/// # Example
///
/// ```
/// use metafilter::utils::sql::quote_identifier;
///
/// assert_eq!(quote_identifier("title"), "\"title\"");
/// assert_eq!(quote_identifier("my\"col"), "\"my\"\"col\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Escape a value for use inside a single-quoted SQL string literal
pub fn escape_string_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// Count positional `?` placeholders in a SQL fragment
pub fn count_placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}
