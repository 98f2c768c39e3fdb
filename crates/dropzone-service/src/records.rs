//! Normalization of record-store responses into plain values or errors.

use serde_json::Value;
use tracing::warn;

use dropzone_core::error::{AppError, ErrorKind};
use dropzone_core::result::AppResult;
use dropzone_core::traits::RecordClient;
use dropzone_core::types::{
    DeleteResponse, FetchQuery, FetchResponse, ID_FIELD, MutationResponse, Record,
    WhereCondition,
};

/// Rows of a fetch. A refused fetch is an error; a fetch with no data is empty.
pub(crate) fn fetched(resp: FetchResponse, table: &str) -> AppResult<Vec<Record>> {
    if !resp.success {
        return Err(AppError::backend(resp.message.unwrap_or_else(|| {
            format!("Failed to fetch records from {table}")
        })));
    }
    Ok(resp.data.unwrap_or_default())
}

/// The single record written by a one-record create or update.
pub(crate) fn single_result(resp: MutationResponse, failure: &str) -> AppResult<Record> {
    if !resp.success {
        return Err(AppError::backend(
            resp.message.unwrap_or_else(|| failure.to_string()),
        ));
    }
    let Some(result) = resp.results.into_iter().next() else {
        return Err(AppError::backend(failure));
    };
    if !result.success {
        return Err(AppError::backend(
            result.message.unwrap_or_else(|| failure.to_string()),
        ));
    }
    result
        .data
        .ok_or_else(|| AppError::backend(format!("{failure}: no record returned")))
}

/// Outcome of a batch delete.
pub(crate) fn deleted(resp: DeleteResponse, failure: &str) -> AppResult<bool> {
    if resp.success {
        Ok(true)
    } else {
        Err(AppError::backend(
            resp.message.unwrap_or_else(|| failure.to_string()),
        ))
    }
}

/// Decode a record, treating a shape mismatch as a backend failure.
pub(crate) fn decode<T>(
    record: Record,
    table: &str,
    from_record: impl FnOnce(Record) -> Result<T, serde_json::Error>,
) -> AppResult<T> {
    from_record(record).map_err(|e| {
        AppError::with_source(
            ErrorKind::Backend,
            format!("Unexpected record shape from {table}: {e}"),
            e,
        )
    })
}

/// Decode listed rows. Rows that do not match the entity shape are
/// logged and skipped so one foreign row cannot hide the rest.
pub(crate) fn decode_rows<T>(
    rows: Vec<Record>,
    table: &str,
    from_record: impl Fn(Record) -> Result<T, serde_json::Error>,
) -> Vec<T> {
    rows.into_iter()
        .filter_map(|record| {
            let id = record.get(ID_FIELD).cloned().unwrap_or(Value::Null);
            match from_record(record) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(table, id = %id, error = %e, "Skipping malformed record");
                    None
                }
            }
        })
        .collect()
}

/// Whether a record with the given id exists.
pub(crate) async fn exists(client: &dyn RecordClient, table: &str, id: &str) -> AppResult<bool> {
    let resp = client.get_record_by_id(table, id, &[]).await?;
    if !resp.success {
        return Err(AppError::backend(
            resp.message
                .unwrap_or_else(|| format!("Failed to look up {id} in {table}")),
        ));
    }
    Ok(resp.data.is_some())
}

/// Number of rows matching the conditions.
pub(crate) async fn count(
    client: &dyn RecordClient,
    table: &str,
    conditions: Vec<WhereCondition>,
) -> AppResult<u64> {
    let mut query = FetchQuery::new(["Name"]);
    query.where_conditions = conditions;
    let rows = fetched(client.fetch_records(table, &query).await?, table)?;
    Ok(rows.len() as u64)
}

/// Ids as the store's string form.
pub(crate) fn id_values<T: ToString>(ids: &[T]) -> Vec<Value> {
    ids.iter().map(|id| Value::String(id.to_string())).collect()
}
