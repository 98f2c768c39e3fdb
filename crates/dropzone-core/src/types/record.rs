//! Generic record shapes exchanged with the record store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::filter::WhereCondition;
use super::sorting::OrderBy;

/// A single table row as a JSON object keyed by field name.
pub type Record = Map<String, Value>;

/// Name of the identity field on every record.
pub const ID_FIELD: &str = "Id";

/// Parameters for a `fetch_records` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchQuery {
    /// Fields to return. Empty means every field.
    pub fields: Vec<String>,
    /// Conditions, combined with AND.
    #[serde(rename = "where")]
    pub where_conditions: Vec<WhereCondition>,
    /// Ordering clauses, applied in order.
    #[serde(rename = "orderBy")]
    pub order_by: Vec<OrderBy>,
}

impl FetchQuery {
    /// Create a query returning the given fields.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: WhereCondition) -> Self {
        self.where_conditions.push(condition);
        self
    }

    /// Add an ordering clause.
    pub fn with_order(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }
}

/// Response to `fetch_records`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Whether the backend accepted the query.
    pub success: bool,
    /// Matching records; `None` when the backend reports no data.
    pub data: Option<Vec<Record>>,
    /// Backend message, usually set on failure.
    pub message: Option<String>,
}

/// Response to `get_record_by_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    /// Whether the backend accepted the lookup.
    pub success: bool,
    /// The record, or `None` when nothing matched.
    pub data: Option<Record>,
    /// Backend message, usually set on failure.
    pub message: Option<String>,
}

/// Per-record outcome inside a create or update response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    /// Whether this record was written.
    pub success: bool,
    /// The stored record after the write.
    pub data: Option<Record>,
    /// Reason for a failed write.
    pub message: Option<String>,
}

/// Response to `create_records` / `update_records`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    /// Whether the batch as a whole was accepted.
    pub success: bool,
    /// One result per submitted record, in submission order.
    pub results: Vec<RecordResult>,
    /// Backend message, usually set on failure.
    pub message: Option<String>,
}

/// Response to `delete_records`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Whether every listed record was removed.
    pub success: bool,
    /// Backend message, usually set on failure.
    pub message: Option<String>,
}
