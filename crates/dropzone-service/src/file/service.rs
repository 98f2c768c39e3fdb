//! File CRUD against the `file1` table.

use std::sync::Arc;

use tracing::{debug, error, info};

use dropzone_core::error::AppError;
use dropzone_core::result::AppResult;
use dropzone_core::traits::{Clock, RecordClient};
use dropzone_core::types::{
    FetchQuery, FileId, FolderId, ID_FIELD, IdBatch, OrderBy, WhereCondition,
};
use dropzone_entity::file::{File, FileInput};
use dropzone_entity::schema::{FILE_FOLDER_FIELD, FILE_TABLE, FOLDER_TABLE, NAME_FIELD};

use crate::records;

/// Translates typed file operations into record-store calls.
///
/// Every public method logs a failure and returns the original error.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Record store client.
    client: Arc<dyn RecordClient>,
    /// Source of default timestamps.
    clock: Arc<dyn Clock>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(client: Arc<dyn RecordClient>, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    /// Lists files directly inside a folder (`None` = root), optionally
    /// narrowed to names containing `search`. Ordered by name.
    pub async fn list(
        &self,
        folder_id: Option<FolderId>,
        search: Option<&str>,
    ) -> AppResult<Vec<File>> {
        self.try_list(folder_id, search)
            .await
            .inspect_err(|e| error!(table = FILE_TABLE.name, error = %e, "Error fetching files"))
    }

    async fn try_list(
        &self,
        folder_id: Option<FolderId>,
        search: Option<&str>,
    ) -> AppResult<Vec<File>> {
        let query = list_query(folder_id, search);
        let resp = self.client.fetch_records(FILE_TABLE.name, &query).await?;
        let rows = records::fetched(resp, FILE_TABLE.name)?;
        let files = records::decode_rows(rows, FILE_TABLE.name, File::from_record);

        debug!(folder_id = ?folder_id, count = files.len(), "Listed files");
        Ok(files)
    }

    /// Gets a file by ID. A missing file is `Ok(None)`.
    pub async fn get_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        self.try_get(id).await.inspect_err(
            |e| error!(table = FILE_TABLE.name, file_id = %id, error = %e, "Error fetching file"),
        )
    }

    async fn try_get(&self, id: FileId) -> AppResult<Option<File>> {
        let resp = self
            .client
            .get_record_by_id(FILE_TABLE.name, &id.to_string(), &FILE_TABLE.field_list())
            .await?;
        if !resp.success {
            return Err(AppError::backend(
                resp.message
                    .unwrap_or_else(|| format!("Failed to fetch file {id}")),
            ));
        }
        resp.data
            .map(|r| records::decode(r, FILE_TABLE.name, File::from_record))
            .transpose()
    }

    /// Creates a file record.
    ///
    /// The name is required. Missing timestamps default to now, the public
    /// flag to `false`, and the size to zero.
    pub async fn create(&self, input: FileInput) -> AppResult<File> {
        self.try_create(input)
            .await
            .inspect_err(|e| error!(table = FILE_TABLE.name, error = %e, "Error creating file"))
    }

    async fn try_create(&self, mut input: FileInput) -> AppResult<File> {
        if input.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(AppError::validation("File name is required"));
        }
        self.ensure_folder_exists(&input).await?;

        let now = self.clock.now();
        input.upload_date.get_or_insert(now);
        input.last_modified.get_or_insert(now);
        input.is_public.get_or_insert(false);
        input.size.get_or_insert(0);

        let record = input.to_record()?;
        let resp = self
            .client
            .create_records(FILE_TABLE.name, vec![record])
            .await?;
        let record = records::single_result(resp, "Failed to create file")?;
        let file = records::decode(record, FILE_TABLE.name, File::from_record)?;

        info!(
            file_id = %file.id,
            name = %file.name,
            size = file.size,
            folder_id = ?file.folder_id,
            "File created"
        );

        Ok(file)
    }

    /// Updates the given fields of a file.
    pub async fn update(&self, id: FileId, input: FileInput) -> AppResult<File> {
        self.try_update(id, input).await.inspect_err(
            |e| error!(table = FILE_TABLE.name, file_id = %id, error = %e, "Error updating file"),
        )
    }

    async fn try_update(&self, id: FileId, input: FileInput) -> AppResult<File> {
        if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("File name cannot be empty"));
        }
        self.ensure_folder_exists(&input).await?;

        let mut record = input.to_record()?;
        record.insert(ID_FIELD.to_string(), id.to_string().into());

        let resp = self
            .client
            .update_records(FILE_TABLE.name, vec![record])
            .await?;
        let record = records::single_result(resp, "Failed to update file")?;
        let file = records::decode(record, FILE_TABLE.name, File::from_record)?;

        info!(file_id = %id, "File updated");
        Ok(file)
    }

    /// Deletes one or more files in a single batched call.
    pub async fn delete(&self, ids: impl Into<IdBatch<FileId>>) -> AppResult<bool> {
        let ids = ids.into();
        self.try_delete(&ids)
            .await
            .inspect_err(|e| {
                error!(
                    table = FILE_TABLE.name,
                    count = ids.len(),
                    error = %e,
                    "Error deleting files"
                )
            })
    }

    async fn try_delete(&self, ids: &IdBatch<FileId>) -> AppResult<bool> {
        if ids.is_empty() {
            return Ok(true);
        }
        let record_ids: Vec<String> = ids.as_slice().iter().map(ToString::to_string).collect();
        let resp = self
            .client
            .delete_records(FILE_TABLE.name, &record_ids)
            .await?;
        let ok = records::deleted(resp, "Failed to delete files")?;

        info!(count = ids.len(), "Files deleted");
        Ok(ok)
    }

    /// Renames a file.
    pub async fn rename(&self, id: FileId, name: &str) -> AppResult<File> {
        self.update(id, FileInput::named(name)).await
    }

    /// Moves a file to another folder (`None` = root).
    pub async fn move_to(&self, id: FileId, folder_id: Option<FolderId>) -> AppResult<File> {
        self.update(id, FileInput::default().in_folder(folder_id))
            .await
    }

    /// Replaces a file's tags.
    pub async fn set_tags(&self, id: FileId, tags: Vec<String>) -> AppResult<File> {
        let input = FileInput {
            tags: Some(tags),
            ..FileInput::default()
        };
        self.update(id, input).await
    }

    /// Changes a file's public visibility.
    pub async fn set_public(&self, id: FileId, is_public: bool) -> AppResult<File> {
        let input = FileInput {
            is_public: Some(is_public),
            ..FileInput::default()
        };
        self.update(id, input).await
    }

    async fn ensure_folder_exists(&self, input: &FileInput) -> AppResult<()> {
        if let Some(Some(folder_id)) = input.folder_id {
            let found =
                records::exists(self.client.as_ref(), FOLDER_TABLE.name, &folder_id.to_string())
                    .await?;
            if !found {
                return Err(AppError::validation(format!(
                    "Folder {folder_id} does not exist"
                )));
            }
        }
        Ok(())
    }
}

/// Query for the files of one folder, optionally narrowed by name.
fn list_query(folder_id: Option<FolderId>, search: Option<&str>) -> FetchQuery {
    let folder_condition = match folder_id {
        Some(id) => WhereCondition::exact(FILE_FOLDER_FIELD, id.to_string()),
        None => WhereCondition::unset(FILE_FOLDER_FIELD),
    };
    let mut query = FetchQuery::new(FILE_TABLE.all_fields.iter().copied())
        .with_condition(folder_condition)
        .with_order(OrderBy::asc(NAME_FIELD));

    if let Some(text) = search.map(str::trim).filter(|t| !t.is_empty()) {
        query = query.with_condition(WhereCondition::contains(NAME_FIELD, text));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use dropzone_core::error::ErrorKind;
    use dropzone_core::traits::ManualClock;
    use dropzone_core::types::FilterOperator;
    use dropzone_store::{MemoryRecordClient, StoreOp};
    use serde_json::json;

    fn setup() -> (MemoryRecordClient, FileService, Arc<ManualClock>) {
        let store = MemoryRecordClient::new();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        ));
        let service = FileService::new(Arc::new(store.clone()), clock.clone());
        (store, service, clock)
    }

    fn seed_folder(store: &MemoryRecordClient, name: &str) -> FolderId {
        let record = json!({
            "Name": name,
            "created_date": "2024-01-01T00:00:00Z",
            "parent_id": null
        });
        let serde_json::Value::Object(record) = record else {
            panic!("not an object");
        };
        store.seed(FOLDER_TABLE.name, [record])[0].parse().unwrap()
    }

    #[test]
    fn test_list_query_root_uses_unset_filter() {
        let query = list_query(None, Some("   "));
        assert_eq!(query.where_conditions.len(), 1);
        assert_eq!(
            query.where_conditions[0].operator,
            FilterOperator::DoesNotHaveValue
        );
        assert!(query.where_conditions[0].values.is_empty());
        assert_eq!(query.order_by, vec![OrderBy::asc("Name")]);
    }

    #[test]
    fn test_list_query_trims_search() {
        let folder = FolderId::new();
        let query = list_query(Some(folder), Some("  rep "));
        assert_eq!(
            query.where_conditions,
            vec![
                WhereCondition::exact("folder_id", folder.to_string()),
                WhereCondition::contains("Name", "rep"),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let (store, service, clock) = setup();
        let file = service.create(FileInput::named("notes.txt")).await.unwrap();

        assert_eq!(file.name, "notes.txt");
        assert_eq!(file.size, 0);
        assert!(!file.is_public);
        assert_eq!(file.upload_date, clock.now());
        assert_eq!(file.last_modified, clock.now());
        assert_eq!(file.folder_id, None);

        let sent = &store.calls_of(StoreOp::Create)[0].records[0];
        for key in sent.keys() {
            assert!(FILE_TABLE.is_updateable(key), "{key} forwarded");
        }
        for key in ["upload_date", "last_modified", "is_public", "size"] {
            assert!(sent.contains_key(key), "{key} not defaulted");
        }
    }

    #[tokio::test]
    async fn test_create_keeps_explicit_values() {
        let (_store, service, clock) = setup();
        let earlier = clock.now() - Duration::days(3);
        let input = FileInput {
            size: Some(4096),
            is_public: Some(true),
            last_modified: Some(earlier),
            mime_type: Some("image/png".into()),
            ..FileInput::named("cat.png")
        };
        let file = service.create(input).await.unwrap();
        assert_eq!(file.size, 4096);
        assert!(file.is_public);
        assert_eq!(file.last_modified, earlier);
        assert_eq!(file.upload_date, clock.now());
        assert_eq!(file.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_create_without_name_never_reaches_backend() {
        let (store, service, _) = setup();
        for input in [FileInput::default(), FileInput::named(""), FileInput::named("  ")] {
            let err = service.create(input).await.unwrap_err();
            assert!(err.is(ErrorKind::Validation));
        }
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_in_missing_folder_is_rejected() {
        let (store, service, _) = setup();
        let err = service
            .create(FileInput::named("a.txt").in_folder(Some(FolderId::new())))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
        assert!(store.calls_of(StoreOp::Create).is_empty());
    }

    #[tokio::test]
    async fn test_create_backend_refusal_is_backend_error() {
        let (store, service, _) = setup();
        store.set_reject_writes(true);
        let err = service.create(FileInput::named("a.txt")).await.unwrap_err();
        assert!(err.is(ErrorKind::Backend));
    }

    #[tokio::test]
    async fn test_list_root_and_folder_and_search() {
        let (store, service, _) = setup();
        let docs = seed_folder(&store, "Docs");
        service.create(FileInput::named("b-report.txt")).await.unwrap();
        service.create(FileInput::named("a-photo.png")).await.unwrap();
        service
            .create(FileInput::named("Report-2024.pdf").in_folder(Some(docs)))
            .await
            .unwrap();

        let root = service.list(None, None).await.unwrap();
        let names: Vec<_> = root.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a-photo.png", "b-report.txt"]);

        let in_docs = service.list(Some(docs), None).await.unwrap();
        assert_eq!(in_docs.len(), 1);
        assert_eq!(in_docs[0].folder_id, Some(docs));

        let hits = service.list(None, Some("REPORT")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "b-report.txt");
    }

    #[tokio::test]
    async fn test_list_empty_table_is_empty() {
        let (_, service, _) = setup();
        assert!(service.list(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_skips_rows_with_foreign_ids() {
        let (store, service, _) = setup();
        let kept = service.create(FileInput::named("a.txt")).await.unwrap();
        let foreign = json!({
            "Id": "c",
            "Name": "c.txt",
            "upload_date": "2024-01-01T00:00:00Z",
            "last_modified": "2024-01-01T00:00:00Z"
        });
        let serde_json::Value::Object(foreign) = foreign else {
            panic!("not an object");
        };
        store.seed(FILE_TABLE.name, [foreign]);
        assert_eq!(store.records(FILE_TABLE.name).len(), 2);

        let files = service.list(None, None).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_create_stamps_current_clock() {
        let (store, service, clock) = setup();
        service.create(FileInput::named("old.txt")).await.unwrap();
        store.clear_calls();

        let later = Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap();
        clock.set(later);
        let file = service.create(FileInput::named("new.txt")).await.unwrap();
        assert_eq!(file.upload_date, later);
        assert_eq!(file.last_modified, later);
        assert_eq!(store.calls().len(), 1);
        assert_eq!(store.calls_of(StoreOp::Create).len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_none() {
        let (_, service, _) = setup();
        assert!(service.get_by_id(FileId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_injects_id_and_filters_fields() {
        let (store, service, _) = setup();
        let file = service.create(FileInput::named("a.txt")).await.unwrap();

        let mut edited = FileInput::from(&file);
        edited.name = Some("b.txt".into());
        let updated = service.update(file.id, edited).await.unwrap();
        assert_eq!(updated.id, file.id);
        assert_eq!(updated.name, "b.txt");

        let sent = &store.calls_of(StoreOp::Update)[0].records[0];
        assert_eq!(sent.get("Id"), Some(&json!(file.id.to_string())));
        for key in sent.keys().filter(|k| k.as_str() != "Id") {
            assert!(FILE_TABLE.is_updateable(key));
        }
    }

    #[tokio::test]
    async fn test_update_missing_file_is_backend_error() {
        let (_, service, _) = setup();
        let err = service
            .rename(FileId::new(), "x.txt")
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Backend));
    }

    #[tokio::test]
    async fn test_move_tag_and_publish() {
        let (store, service, _) = setup();
        let docs = seed_folder(&store, "Docs");
        let file = service.create(FileInput::named("a.txt")).await.unwrap();

        let moved = service.move_to(file.id, Some(docs)).await.unwrap();
        assert_eq!(moved.folder_id, Some(docs));
        let back = service.move_to(file.id, None).await.unwrap();
        assert_eq!(back.folder_id, None);

        let tagged = service
            .set_tags(file.id, vec!["work".into(), "draft".into()])
            .await
            .unwrap();
        assert_eq!(tagged.tags, vec!["work".to_string(), "draft".to_string()]);

        let public = service.set_public(file.id, true).await.unwrap();
        assert!(public.is_public);
    }

    #[tokio::test]
    async fn test_delete_single_and_batch() {
        let (store, service, _) = setup();
        let a = service.create(FileInput::named("a")).await.unwrap();
        let b = service.create(FileInput::named("b")).await.unwrap();
        let c = service.create(FileInput::named("c")).await.unwrap();

        assert!(service.delete(vec![a.id, b.id]).await.unwrap());
        let left = service.list(None, None).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, c.id);

        assert!(service.delete(c.id).await.unwrap());
        let deletes = store.calls_of(StoreOp::Delete);
        assert_eq!(deletes.len(), 2);
        assert_eq!(deletes[0].ids.len(), 2);
        assert_eq!(deletes[1].ids, vec![c.id.to_string()]);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_backend_error() {
        let (_, service, _) = setup();
        let err = service.delete(FileId::new()).await.unwrap_err();
        assert!(err.is(ErrorKind::Backend));
    }
}
