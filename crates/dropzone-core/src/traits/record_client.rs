//! Record client trait for the external record store.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::record::{
    DeleteResponse, FetchQuery, FetchResponse, MutationResponse, Record, RecordResponse,
};

/// Named-table request/response interface to the record store.
///
/// `Err` means the call itself failed (transport, serialization). A call
/// that reached the store but was refused comes back as `Ok` with
/// `success = false`; callers must check both. Implementations are
/// injected into services as `Arc<dyn RecordClient>`.
#[async_trait]
pub trait RecordClient: Send + Sync + std::fmt::Debug + 'static {
    /// Query a table with filters, ordering, and a field projection.
    async fn fetch_records(&self, table: &str, query: &FetchQuery) -> AppResult<FetchResponse>;

    /// Look up a single record by its `Id`.
    async fn get_record_by_id(
        &self,
        table: &str,
        id: &str,
        fields: &[String],
    ) -> AppResult<RecordResponse>;

    /// Insert records. The store assigns `Id` and audit fields.
    async fn create_records(&self, table: &str, records: Vec<Record>)
    -> AppResult<MutationResponse>;

    /// Merge fields into existing records identified by their `Id`.
    async fn update_records(&self, table: &str, records: Vec<Record>)
    -> AppResult<MutationResponse>;

    /// Remove records by `Id`.
    async fn delete_records(&self, table: &str, record_ids: &[String])
    -> AppResult<DeleteResponse>;
}
