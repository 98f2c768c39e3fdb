//! [`RecordClient`] backed by process memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use dropzone_core::result::AppResult;
use dropzone_core::traits::RecordClient;
use dropzone_core::types::{
    DeleteResponse, FetchQuery, FetchResponse, ID_FIELD, MutationResponse, Record, RecordResponse,
    RecordResult,
};

use super::matcher;

/// Fields the store owns. Client-supplied values are dropped.
const MANAGED_FIELDS: [&str; 5] = [ID_FIELD, "CreatedOn", "CreatedBy", "ModifiedOn", "ModifiedBy"];

/// Kind of call made against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// `fetch_records`.
    Fetch,
    /// `get_record_by_id`.
    Get,
    /// `create_records`.
    Create,
    /// `update_records`.
    Update,
    /// `delete_records`.
    Delete,
}

/// A call as received by the store, before any store-side changes.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCall {
    /// Operation.
    pub op: StoreOp,
    /// Target table.
    pub table: String,
    /// Records submitted (create/update).
    pub records: Vec<Record>,
    /// Ids submitted (get/delete).
    pub ids: Vec<String>,
    /// Query submitted (fetch).
    pub query: Option<FetchQuery>,
}

impl StoreCall {
    fn new(op: StoreOp, table: &str) -> Self {
        Self {
            op,
            table: table.to_string(),
            records: Vec::new(),
            ids: Vec::new(),
            query: None,
        }
    }
}

/// In-memory record store.
///
/// Tables are created on first write. Rows keep insertion order, which is
/// also the tie-break order for sorted fetches. Every call is appended to
/// a call log so callers can inspect exactly what was sent.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordClient {
    /// Rows per table name.
    tables: Arc<DashMap<String, Vec<Record>>>,
    /// Calls received, oldest first.
    calls: Arc<Mutex<Vec<StoreCall>>>,
    /// When set, every write is refused with `success = false`.
    reject_writes: Arc<AtomicBool>,
}

impl MemoryRecordClient {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows directly, bypassing the call log. Rows without an `Id`
    /// get a fresh one. Returns the ids in insertion order.
    pub fn seed(&self, table: &str, records: impl IntoIterator<Item = Record>) -> Vec<String> {
        let mut rows = self.tables.entry(table.to_string()).or_default();
        records
            .into_iter()
            .map(|mut record| {
                let id = match record.get(ID_FIELD) {
                    Some(Value::String(s)) if !s.is_empty() => s.clone(),
                    _ => Uuid::new_v4().to_string(),
                };
                record.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                rows.push(record);
                id
            })
            .collect()
    }

    /// Snapshot of a table's rows.
    pub fn records(&self, table: &str) -> Vec<Record> {
        self.tables
            .get(table)
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Calls of one kind received so far.
    pub fn calls_of(&self, op: StoreOp) -> Vec<StoreCall> {
        self.calls().into_iter().filter(|c| c.op == op).collect()
    }

    /// Forget the call log.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Refuse (or accept again) all writes.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn log(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn writes_rejected(&self) -> bool {
        self.reject_writes.load(Ordering::SeqCst)
    }

    fn timestamp() -> Value {
        Value::String(Utc::now().to_rfc3339())
    }

    fn strip_managed(record: &mut Record) {
        for field in MANAGED_FIELDS {
            record.remove(field);
        }
    }
}

fn record_id(record: &Record) -> Option<String> {
    match record.get(ID_FIELD) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl RecordClient for MemoryRecordClient {
    async fn fetch_records(&self, table: &str, query: &FetchQuery) -> AppResult<FetchResponse> {
        let mut call = StoreCall::new(StoreOp::Fetch, table);
        call.query = Some(query.clone());
        self.log(call);

        let Some(rows) = self.tables.get(table) else {
            debug!(table, "Fetch on unknown table");
            return Ok(FetchResponse {
                success: true,
                data: None,
                message: None,
            });
        };

        let mut matched: Vec<&Record> = rows
            .iter()
            .filter(|r| matcher::matches_all(r, &query.where_conditions))
            .collect();
        matched.sort_by(|a, b| matcher::compare(a, b, &query.order_by));

        let data: Vec<Record> = matched
            .into_iter()
            .map(|r| matcher::project(r, &query.fields))
            .collect();

        debug!(table, count = data.len(), "Fetched records");
        Ok(FetchResponse {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: &str,
        fields: &[String],
    ) -> AppResult<RecordResponse> {
        let mut call = StoreCall::new(StoreOp::Get, table);
        call.ids = vec![id.to_string()];
        self.log(call);

        let data = self.tables.get(table).and_then(|rows| {
            rows.iter()
                .find(|r| record_id(r).as_deref() == Some(id))
                .map(|r| matcher::project(r, fields))
        });

        Ok(RecordResponse {
            success: true,
            data,
            message: None,
        })
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> AppResult<MutationResponse> {
        let mut call = StoreCall::new(StoreOp::Create, table);
        call.records = records.clone();
        self.log(call);

        if self.writes_rejected() {
            return Ok(MutationResponse {
                success: false,
                results: Vec::new(),
                message: Some("Writes are disabled".to_string()),
            });
        }

        let mut rows = self.tables.entry(table.to_string()).or_default();
        let results = records
            .into_iter()
            .map(|mut record| {
                Self::strip_managed(&mut record);
                let now = Self::timestamp();
                record.insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
                record.insert("CreatedOn".to_string(), now.clone());
                record.insert("ModifiedOn".to_string(), now);
                rows.push(record.clone());
                RecordResult {
                    success: true,
                    data: Some(record),
                    message: None,
                }
            })
            .collect::<Vec<_>>();

        debug!(table, count = results.len(), "Created records");
        Ok(MutationResponse {
            success: true,
            results,
            message: None,
        })
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> AppResult<MutationResponse> {
        let mut call = StoreCall::new(StoreOp::Update, table);
        call.records = records.clone();
        self.log(call);

        if self.writes_rejected() {
            return Ok(MutationResponse {
                success: false,
                results: Vec::new(),
                message: Some("Writes are disabled".to_string()),
            });
        }

        let mut rows = self.tables.entry(table.to_string()).or_default();
        let results = records
            .into_iter()
            .map(|mut changes| {
                let Some(id) = record_id(&changes) else {
                    return RecordResult {
                        success: false,
                        data: None,
                        message: Some("Record Id is required".to_string()),
                    };
                };
                let Some(row) = rows
                    .iter_mut()
                    .find(|r| record_id(r).as_deref() == Some(id.as_str()))
                else {
                    return RecordResult {
                        success: false,
                        data: None,
                        message: Some(format!("Record not found: {id}")),
                    };
                };
                Self::strip_managed(&mut changes);
                row.extend(changes);
                row.insert("ModifiedOn".to_string(), Self::timestamp());
                RecordResult {
                    success: true,
                    data: Some(row.clone()),
                    message: None,
                }
            })
            .collect::<Vec<_>>();

        debug!(table, count = results.len(), "Updated records");
        Ok(MutationResponse {
            success: true,
            results,
            message: None,
        })
    }

    async fn delete_records(
        &self,
        table: &str,
        record_ids: &[String],
    ) -> AppResult<DeleteResponse> {
        let mut call = StoreCall::new(StoreOp::Delete, table);
        call.ids = record_ids.to_vec();
        self.log(call);

        if self.writes_rejected() {
            return Ok(DeleteResponse {
                success: false,
                message: Some("Writes are disabled".to_string()),
            });
        }

        let mut rows = self.tables.entry(table.to_string()).or_default();
        let missing: Vec<&String> = record_ids
            .iter()
            .filter(|id| {
                !rows
                    .iter()
                    .any(|r| record_id(r).as_deref() == Some(id.as_str()))
            })
            .collect();
        if !missing.is_empty() {
            let listed: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
            return Ok(DeleteResponse {
                success: false,
                message: Some(format!("Records not found: {}", listed.join(", "))),
            });
        }

        rows.retain(|r| {
            record_id(r).is_none_or(|id| !record_ids.iter().any(|wanted| *wanted == id))
        });
        debug!(table, count = record_ids.len(), "Deleted records");
        Ok(DeleteResponse {
            success: true,
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropzone_core::types::{OrderBy, WhereCondition};
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_fetch_unknown_table_has_no_data() {
        let store = MemoryRecordClient::new();
        let resp = store
            .fetch_records("nope", &FetchQuery::default())
            .await
            .unwrap();
        assert!(resp.success);
        assert!(resp.data.is_none());
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_ignores_managed_fields() {
        let store = MemoryRecordClient::new();
        let resp = store
            .create_records(
                "folder1",
                vec![record(json!({ "Id": "forged", "CreatedBy": "mallory", "Name": "Docs" }))],
            )
            .await
            .unwrap();
        assert!(resp.success);
        let created = resp.results[0].data.clone().unwrap();
        assert_ne!(created.get("Id"), Some(&json!("forged")));
        assert!(created.get("CreatedBy").is_none());
        assert!(created.get("CreatedOn").is_some());
        assert_eq!(store.records("folder1").len(), 1);
        // The call log keeps what the client actually sent.
        assert_eq!(
            store.calls_of(StoreOp::Create)[0].records[0].get("Id"),
            Some(&json!("forged"))
        );
    }

    #[tokio::test]
    async fn test_fetch_filters_orders_and_projects() {
        let store = MemoryRecordClient::new();
        store.seed(
            "file1",
            [
                record(json!({ "Name": "zeta.txt", "folder_id": null, "size": 1 })),
                record(json!({ "Name": "Alpha.txt", "folder_id": null, "size": 2 })),
                record(json!({ "Name": "nested.txt", "folder_id": "f1", "size": 3 })),
            ],
        );
        let query = FetchQuery::new(["Name"])
            .with_condition(WhereCondition::unset("folder_id"))
            .with_order(OrderBy::asc("Name"));
        let data = store.fetch_records("file1", &query).await.unwrap().data.unwrap();
        let names: Vec<_> = data.iter().map(|r| r["Name"].clone()).collect();
        assert_eq!(names, vec![json!("Alpha.txt"), json!("zeta.txt")]);
        assert!(data[0].get("size").is_none());
        assert!(data[0].get("Id").is_some());
    }

    #[tokio::test]
    async fn test_get_missing_returns_no_data() {
        let store = MemoryRecordClient::new();
        store.seed("file1", [record(json!({ "Name": "a" }))]);
        let resp = store.get_record_by_id("file1", "missing", &[]).await.unwrap();
        assert!(resp.success);
        assert!(resp.data.is_none());
    }

    #[tokio::test]
    async fn test_update_merges_and_reports_missing() {
        let store = MemoryRecordClient::new();
        let ids = store.seed("file1", [record(json!({ "Name": "a", "size": 1 }))]);
        let resp = store
            .update_records(
                "file1",
                vec![
                    record(json!({ "Id": ids[0], "Name": "b" })),
                    record(json!({ "Id": "ghost", "Name": "c" })),
                ],
            )
            .await
            .unwrap();
        assert!(resp.results[0].success);
        assert!(!resp.results[1].success);
        let row = &store.records("file1")[0];
        assert_eq!(row["Name"], json!("b"));
        assert_eq!(row["size"], json!(1));
        assert!(row.get("ModifiedOn").is_some());
    }

    #[tokio::test]
    async fn test_delete_is_all_or_nothing() {
        let store = MemoryRecordClient::new();
        let ids = store.seed(
            "file1",
            [
                record(json!({ "Name": "a" })),
                record(json!({ "Name": "b" })),
                record(json!({ "Name": "c" })),
            ],
        );

        let resp = store
            .delete_records("file1", &[ids[0].clone(), "ghost".to_string()])
            .await
            .unwrap();
        assert!(!resp.success);
        assert_eq!(store.records("file1").len(), 3);

        let resp = store
            .delete_records("file1", &[ids[0].clone(), ids[1].clone()])
            .await
            .unwrap();
        assert!(resp.success);
        let left = store.records("file1");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0]["Name"], json!("c"));
    }

    #[tokio::test]
    async fn test_rejected_writes_leave_store_untouched() {
        let store = MemoryRecordClient::new();
        store.set_reject_writes(true);
        let resp = store
            .create_records("file1", vec![record(json!({ "Name": "a" }))])
            .await
            .unwrap();
        assert!(!resp.success);
        assert!(store.records("file1").is_empty());
    }
}
