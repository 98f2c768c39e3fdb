//! Filter types for record-store queries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter comparison operator understood by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// The field equals one of the listed values.
    ExactMatch,
    /// The field is unset (absent, null, or empty). Takes no values.
    DoesNotHaveValue,
    /// The field contains the value as a substring, ignoring case.
    Contains,
}

/// A single `where` condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereCondition {
    /// The record field to filter on.
    pub field_name: String,
    /// The comparison operator.
    pub operator: FilterOperator,
    /// Operand values; empty for [`FilterOperator::DoesNotHaveValue`].
    pub values: Vec<Value>,
}

impl WhereCondition {
    /// Create a new condition.
    pub fn new(
        field_name: impl Into<String>,
        operator: FilterOperator,
        values: Vec<Value>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            operator,
            values,
        }
    }

    /// Shorthand for an exact-match condition on a single value.
    pub fn exact(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_name, FilterOperator::ExactMatch, vec![value.into()])
    }

    /// Shorthand for a "field is unset" condition.
    pub fn unset(field_name: impl Into<String>) -> Self {
        Self::new(field_name, FilterOperator::DoesNotHaveValue, Vec::new())
    }

    /// Shorthand for a substring condition.
    pub fn contains(field_name: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(
            field_name,
            FilterOperator::Contains,
            vec![Value::String(needle.into())],
        )
    }
}
