//! Unified error type for filter compilation
//!
//! Every problem is terminal: a filter that fails any check is rejected
//! wholesale and no partial clause is produced.

use thiserror::Error;

/// Broad classification of a [`FilterError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong shape: key counts, empty connectives, non-array operands, arity
    MalformedExpression,
    /// Operator symbol unknown or used in the wrong position
    UnsupportedOperator,
    /// Literal of a type the store cannot compare
    UnsupportedValue,
    /// Invalid compiler configuration
    Configuration,
    /// Compiler defect; never caused by caller input
    Internal,
}

/// Error raised while compiling a filter expression
#[derive(Error, Debug)]
pub enum FilterError {
    /// Filter text could not be parsed as JSON
    #[error("Invalid filter JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Filter text exceeds the size limit
    #[error("Filter JSON exceeds maximum size of {max} bytes (got {actual})")]
    TooLarge { max: usize, actual: usize },

    /// Nested connectives exceed the depth limit
    #[error("Filter nesting exceeds maximum depth of {max}")]
    TooDeep { max: usize },

    /// A filter object was expected
    #[error("Expected a filter object, got {actual}")]
    NotAnObject { actual: String },

    /// Nested filter object without keys
    #[error("Empty filter object is not allowed inside a logical operator")]
    EmptyFilter,

    /// Property key is empty or cannot be addressed as a JSON path
    #[error("Invalid property key '{key}': expected identifier segments separated by '.'")]
    InvalidPropertyKey { key: String },

    /// Connective symbol other than `$and` / `$or`
    #[error("Unsupported logical operator: {op}")]
    UnsupportedLogicalOperator { op: String },

    /// Connective value is not an array
    #[error("Logical operator {op} expects an array of filters, got {actual}")]
    LogicalNotArray { op: String, actual: String },

    /// Connective with an empty child list
    #[error("Logical operator {op} requires at least one filter")]
    EmptyLogical { op: String },

    /// Operator object with zero or several keys
    #[error("Expected exactly one operator for property '{key}', got {actual}")]
    OperatorShape { key: String, actual: String },

    /// `$and` / `$or` used where a column operator was expected
    #[error("Did not expect a logical operator here: {op}")]
    UnexpectedLogicalOperator { op: String },

    /// Symbol not present in the operator table
    #[error("Not a valid column operator: {op}")]
    UnknownOperator { op: String },

    /// Array-only operator given a non-array operand
    #[error("Operator {op} expects an array operand, got {actual}")]
    OperandNotArray { op: String, actual: String },

    /// `$between` operand of the wrong length
    #[error("Operator $between expects an array of 2 values, got {actual} value(s)")]
    BetweenArity { actual: usize },

    /// `$in` / `$nin` with an empty array
    #[error("Operator {op} requires at least one value")]
    EmptyOperandList { op: String },

    /// Number with a fractional part
    #[error("Only integer numbers are supported, got {value}")]
    NonIntegerNumber { value: String },

    /// Null or empty operand
    #[error("No operand provided")]
    MissingOperand,

    /// Object or array where a scalar literal was expected
    #[error("Unsupported filter value: {value}")]
    UnsupportedValue { value: String },

    /// Invalid column layout configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Compiler defect (placeholder/parameter mismatch, empty fragment)
    #[error("Internal filter compiler error: {0}")]
    Internal(String),
}

impl FilterError {
    /// Create an operator shape error from the offending operator object
    pub fn operator_shape(key: &str, actual: &serde_json::Value) -> Self {
        Self::OperatorShape {
            key: key.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an unsupported value error from the offending value
    pub fn unsupported_value(value: &serde_json::Value) -> Self {
        Self::UnsupportedValue {
            value: value.to_string(),
        }
    }

    /// Create an internal error and log it
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(error = %message, "Filter compiler invariant violated");
        Self::Internal(message)
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidJson(_)
            | Self::TooLarge { .. }
            | Self::TooDeep { .. }
            | Self::NotAnObject { .. }
            | Self::EmptyFilter
            | Self::InvalidPropertyKey { .. }
            | Self::LogicalNotArray { .. }
            | Self::EmptyLogical { .. }
            | Self::OperatorShape { .. }
            | Self::OperandNotArray { .. }
            | Self::BetweenArity { .. }
            | Self::EmptyOperandList { .. } => ErrorKind::MalformedExpression,
            Self::UnsupportedLogicalOperator { .. }
            | Self::UnexpectedLogicalOperator { .. }
            | Self::UnknownOperator { .. } => ErrorKind::UnsupportedOperator,
            Self::NonIntegerNumber { .. } | Self::MissingOperand | Self::UnsupportedValue { .. } => {
                ErrorKind::UnsupportedValue
            }
            Self::Config(_) => ErrorKind::Configuration,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Check if this error indicates a compiler defect rather than bad input
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}
