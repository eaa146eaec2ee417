//! Compiles MongoDB-style metadata filters into parameterized SQL WHERE
//! clauses for column-and-JSON hybrid storage.

mod app;
pub mod core;
pub mod data;
pub mod utils;

pub use crate::core::config::FilterConfig;
pub use data::error::{ErrorKind, FilterError};
pub use data::filters::{FilterNode, WhereClause, WhereClauseBuilder, parse_filter};
pub use data::sql::Backend;
