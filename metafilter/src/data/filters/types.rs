//! Filter type definitions
//!
//! A filter is a JSON object whose keys are either logical connectives
//! (`$and`, `$or`) or property names. Shape checks run once, when JSON is
//! converted into a [`FilterNode`]; compilation then works on the typed tree.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::literal::{integer_string, is_tagged_date};
use super::operators::{ColumnOp, LogicalOp};
use crate::core::constants::{MAX_FILTER_DEPTH, OPERATOR_SIGIL};
use crate::data::error::FilterError;

/// One filter object; its clauses are implicitly AND-ed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterNode {
    clauses: Vec<FilterClause>,
}

/// A single entry of a filter object
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// `{"$and": [...]}` / `{"$or": [...]}`
    Logical {
        op: LogicalOp,
        children: Vec<FilterNode>,
    },
    /// `{"key": value}` / `{"key": {"$op": operand}}`
    Property { key: String, condition: Condition },
}

/// Condition attached to a property key
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Bare value, shorthand for `$eq`
    Equals(Value),
    /// Explicit operator object
    Compare { op: ColumnOp, operand: Value },
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<String>,
}

impl SqlParams {
    pub fn push(&mut self, value: String) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FilterNode {
    pub fn new(clauses: Vec<FilterClause>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Convert a JSON filter object into a typed tree
    ///
    /// An empty top-level object yields an empty node (no filter); empty
    /// objects nested inside a connective are rejected.
    pub fn from_value(value: &Value) -> Result<Self, FilterError> {
        let map = value.as_object().ok_or_else(|| FilterError::NotAnObject {
            actual: value.to_string(),
        })?;
        parse_node(map, 0)
    }
}

impl FilterClause {
    pub fn logical(op: LogicalOp, children: Vec<FilterNode>) -> Self {
        Self::Logical { op, children }
    }

    pub fn equals(key: impl Into<String>, value: Value) -> Self {
        Self::Property {
            key: key.into(),
            condition: Condition::Equals(value),
        }
    }

    pub fn compare(key: impl Into<String>, op: ColumnOp, operand: Value) -> Self {
        Self::Property {
            key: key.into(),
            condition: Condition::Compare { op, operand },
        }
    }
}

impl<'de> Deserialize<'de> for FilterNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        FilterNode::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn parse_node(map: &Map<String, Value>, depth: usize) -> Result<FilterNode, FilterError> {
    if depth > MAX_FILTER_DEPTH {
        return Err(FilterError::TooDeep {
            max: MAX_FILTER_DEPTH,
        });
    }
    if depth > 0 && map.is_empty() {
        return Err(FilterError::EmptyFilter);
    }

    let clauses = map
        .iter()
        .map(|(key, value)| {
            if key.starts_with(OPERATOR_SIGIL) {
                parse_logical(key, value, depth)
            } else {
                parse_property(key, value)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FilterNode { clauses })
}

fn parse_logical(symbol: &str, value: &Value, depth: usize) -> Result<FilterClause, FilterError> {
    let op = LogicalOp::from_symbol(symbol).ok_or_else(|| {
        FilterError::UnsupportedLogicalOperator {
            op: symbol.to_string(),
        }
    })?;
    let items = value.as_array().ok_or_else(|| FilterError::LogicalNotArray {
        op: symbol.to_string(),
        actual: value.to_string(),
    })?;
    if items.is_empty() {
        return Err(FilterError::EmptyLogical {
            op: symbol.to_string(),
        });
    }

    let children = items
        .iter()
        .map(|item| {
            let map = item.as_object().ok_or_else(|| FilterError::NotAnObject {
                actual: item.to_string(),
            })?;
            parse_node(map, depth + 1)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FilterClause::Logical { op, children })
}

fn parse_property(key: &str, value: &Value) -> Result<FilterClause, FilterError> {
    if key.is_empty() {
        return Err(FilterError::InvalidPropertyKey {
            key: key.to_string(),
        });
    }

    let condition = match value {
        Value::Object(map) if !is_tagged_date(value) => {
            let mut entries = map.iter();
            match (entries.next(), entries.next()) {
                (Some((symbol, operand)), None) => Condition::Compare {
                    op: ColumnOp::parse(symbol)?,
                    operand: operand.clone(),
                },
                _ => return Err(FilterError::operator_shape(key, value)),
            }
        }
        Value::Number(n) if integer_string(n).is_none() => {
            return Err(FilterError::NonIntegerNumber {
                value: n.to_string(),
            });
        }
        _ => Condition::Equals(value.clone()),
    };

    Ok(FilterClause::Property {
        key: key.to_string(),
        condition,
    })
}
