//! Operator tables
//!
//! Maps operator symbols to their SQL keyword and rendering strategy.

use std::fmt;

use crate::core::constants::{
    OP_AND, OP_BETWEEN, OP_CONTAINS, OP_EQ, OP_GT, OP_GTE, OP_IN, OP_LIKE, OP_LT, OP_LTE, OP_NE,
    OP_NIN, OP_OR,
};
use crate::data::error::FilterError;

/// Logical connective joining sibling filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// Look up a connective by symbol (`$and`, `$or`)
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            OP_AND => Some(Self::And),
            OP_OR => Some(Self::Or),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::And => OP_AND,
            Self::Or => OP_OR,
        }
    }

    pub fn sql_keyword(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Comparison applied to a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Nin,
    Between,
    Like,
    Contains,
}

/// How an operator turns into SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendering {
    /// `selector OP placeholder`
    Binary,
    /// `selector OP (p1, ..., pn)`, operand must be a non-empty array
    List,
    /// `selector BETWEEN lo AND hi`, operand must be a 2-element array
    Range,
    /// Dialect text search predicate
    TextSearch,
}

/// One row of the operator table
#[derive(Debug, Clone, Copy)]
pub struct OperatorSpec {
    pub symbol: &'static str,
    pub op: ColumnOp,
    pub sql: &'static str,
    pub rendering: Rendering,
}

/// Every supported column operator, in documentation order
pub const COLUMN_OPERATORS: &[OperatorSpec] = &[
    OperatorSpec {
        symbol: OP_EQ,
        op: ColumnOp::Eq,
        sql: "=",
        rendering: Rendering::Binary,
    },
    OperatorSpec {
        symbol: OP_NE,
        op: ColumnOp::Ne,
        sql: "<>",
        rendering: Rendering::Binary,
    },
    OperatorSpec {
        symbol: OP_LT,
        op: ColumnOp::Lt,
        sql: "<",
        rendering: Rendering::Binary,
    },
    OperatorSpec {
        symbol: OP_LTE,
        op: ColumnOp::Lte,
        sql: "<=",
        rendering: Rendering::Binary,
    },
    OperatorSpec {
        symbol: OP_GT,
        op: ColumnOp::Gt,
        sql: ">",
        rendering: Rendering::Binary,
    },
    OperatorSpec {
        symbol: OP_GTE,
        op: ColumnOp::Gte,
        sql: ">=",
        rendering: Rendering::Binary,
    },
    OperatorSpec {
        symbol: OP_IN,
        op: ColumnOp::In,
        sql: "IN",
        rendering: Rendering::List,
    },
    OperatorSpec {
        symbol: OP_NIN,
        op: ColumnOp::Nin,
        sql: "NOT IN",
        rendering: Rendering::List,
    },
    OperatorSpec {
        symbol: OP_BETWEEN,
        op: ColumnOp::Between,
        sql: "BETWEEN",
        rendering: Rendering::Range,
    },
    OperatorSpec {
        symbol: OP_LIKE,
        op: ColumnOp::Like,
        sql: "LIKE",
        rendering: Rendering::Binary,
    },
    OperatorSpec {
        symbol: OP_CONTAINS,
        op: ColumnOp::Contains,
        sql: "SCORE",
        rendering: Rendering::TextSearch,
    },
];

impl ColumnOp {
    /// Resolve an operator symbol, rejecting connectives and unknown symbols
    pub fn parse(symbol: &str) -> Result<Self, FilterError> {
        if LogicalOp::from_symbol(symbol).is_some() {
            return Err(FilterError::UnexpectedLogicalOperator {
                op: symbol.to_string(),
            });
        }
        COLUMN_OPERATORS
            .iter()
            .find(|spec| spec.symbol == symbol)
            .map(|spec| spec.op)
            .ok_or_else(|| FilterError::UnknownOperator {
                op: symbol.to_string(),
            })
    }

    /// Table row for this operator
    pub fn spec(&self) -> &'static OperatorSpec {
        // Every variant has exactly one row; the index mirrors declaration order.
        &COLUMN_OPERATORS[*self as usize]
    }

    pub fn symbol(&self) -> &'static str {
        self.spec().symbol
    }
}

impl fmt::Display for ColumnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
