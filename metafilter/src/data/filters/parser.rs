//! Filter parsing
//!
//! Parses filter JSON text into a [`FilterNode`] with size validation.

use serde_json::Value;

use super::types::FilterNode;
use crate::core::constants::MAX_FILTER_JSON_SIZE;
use crate::data::error::FilterError;

/// Parse a filter from JSON text
///
/// Blank text, `null` and `{}` all mean "no filter" and return `None`.
pub fn parse_filter(json_str: &str) -> Result<Option<FilterNode>, FilterError> {
    if json_str.len() > MAX_FILTER_JSON_SIZE {
        return Err(FilterError::TooLarge {
            max: MAX_FILTER_JSON_SIZE,
            actual: json_str.len(),
        });
    }
    if json_str.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(json_str)?;
    if value.is_null() {
        return Ok(None);
    }

    let node = FilterNode::from_value(&value)?;
    Ok((!node.is_empty()).then_some(node))
}
