//! Metadata filter compiler
//!
//! Compiles MongoDB-style filter objects into parameterized SQL WHERE
//! clauses. Keys configured as dedicated columns are compared directly;
//! all other keys are read from a JSON metadata column.
//!
//! ## Usage
//!
//! ```
//! use metafilter::core::config::FilterConfig;
//! use metafilter::data::filters::WhereClauseBuilder;
//! use serde_json::json;
//!
//! let config = FilterConfig {
//!     specific_columns: vec!["title".to_string()],
//!     ..FilterConfig::default()
//! };
//! let builder = WhereClauseBuilder::new(config).unwrap();
//! let clause = builder
//!     .build_value(Some(&json!({"title": "Dune", "year": {"$gte": 1965}})))
//!     .unwrap();
//!
//! assert_eq!(
//!     clause.sql,
//!     "WHERE (\"title\" = ?) AND (JSON_VALUE(\"VEC_META\", '$.year') >= TO_DOUBLE(?))"
//! );
//! assert_eq!(clause.params, vec!["Dune", "1965"]);
//! ```

mod builder;
mod columns;
mod literal;
mod operators;
mod parser;
mod types;

pub use builder::{WhereClause, WhereClauseBuilder, join_clauses};
pub use columns::ColumnResolver;
pub use literal::{EncodedLiteral, encode_literal, is_tagged_date};
pub use operators::{COLUMN_OPERATORS, ColumnOp, LogicalOp, OperatorSpec, Rendering};
pub use parser::parse_filter;
pub use types::{Condition, FilterClause, FilterNode, SqlParams};
