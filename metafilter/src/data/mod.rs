//! Data layer
//!
//! - `filters` - Filter tree types and the WHERE clause compiler
//! - `sql` - SQL dialects for the supported backends
//! - `error` - Unified error type

pub mod error;
pub mod filters;
pub mod sql;

pub use error::{ErrorKind, FilterError};
