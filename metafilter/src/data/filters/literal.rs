//! Literal encoding
//!
//! Turns one JSON scalar into a placeholder expression and its string
//! parameter. The placeholder carries a cast chosen from the value's
//! runtime type, since every parameter is bound as text.

use serde_json::{Number, Value};

use crate::core::constants::DATE_TYPE_TAG;
use crate::data::error::FilterError;
use crate::data::sql::{LiteralCast, SqlDialect};

/// Largest integer an f64 represents exactly (2^53)
const MAX_EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

/// One encoded literal: exactly one placeholder and one parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLiteral {
    pub placeholder: String,
    pub param: String,
    /// Cast applied to the placeholder, `None` for plain strings
    pub cast: Option<LiteralCast>,
}

impl EncodedLiteral {
    fn typed(dialect: &dyn SqlDialect, cast: LiteralCast, param: String) -> Self {
        Self {
            placeholder: dialect.typed_placeholder(cast),
            param,
            cast: Some(cast),
        }
    }
}

/// Check for a tagged date value (`{"type": "date", "date": ...}`)
pub fn is_tagged_date(value: &Value) -> bool {
    value
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| t == DATE_TYPE_TAG)
}

/// Decimal form of an integer-valued number, `None` if it has a fractional part
///
/// Integer-valued floats such as `3.0` are accepted and rendered as `3`.
pub fn integer_string(n: &Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return Some(i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_F64_INT)
        .map(|f| format!("{:.0}", f))
}

/// Encode a scalar literal for the given dialect
pub fn encode_literal(dialect: &dyn SqlDialect, value: &Value) -> Result<EncodedLiteral, FilterError> {
    match value {
        Value::Bool(b) => Ok(EncodedLiteral::typed(
            dialect,
            LiteralCast::Boolean,
            b.to_string(),
        )),
        Value::Number(n) => {
            let param = integer_string(n).ok_or_else(|| FilterError::NonIntegerNumber {
                value: n.to_string(),
            })?;
            Ok(EncodedLiteral::typed(dialect, LiteralCast::Double, param))
        }
        Value::Null => Err(FilterError::MissingOperand),
        Value::String(s) if s.is_empty() => Err(FilterError::MissingOperand),
        Value::Object(_) if is_tagged_date(value) => Ok(EncodedLiteral::typed(
            dialect,
            LiteralCast::Date,
            date_param(value)?,
        )),
        Value::Object(_) | Value::Array(_) => Err(FilterError::unsupported_value(value)),
        Value::String(s) => {
            tracing::warn!(
                value = %s,
                "Binding string literal without a type cast; comparison uses the column's native type"
            );
            Ok(EncodedLiteral {
                placeholder: "?".to_string(),
                param: s.clone(),
                cast: None,
            })
        }
    }
}

fn date_param(value: &Value) -> Result<String, FilterError> {
    match value.get("date") {
        Some(Value::String(s)) if s.is_empty() => Err(FilterError::MissingOperand),
        Some(Value::String(s)) => Ok(s.clone()),
        None | Some(Value::Null) => Err(FilterError::unsupported_value(value)),
        Some(other) => Ok(other.to_string()),
    }
}
