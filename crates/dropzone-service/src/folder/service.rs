//! Folder CRUD against the `folder1` table, with tree integrity checks.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use dropzone_core::error::AppError;
use dropzone_core::result::AppResult;
use dropzone_core::traits::{Clock, RecordClient};
use dropzone_core::types::{
    FetchQuery, FilterOperator, FolderId, ID_FIELD, IdBatch, OrderBy, WhereCondition,
};
use dropzone_entity::folder::{Folder, FolderInput};
use dropzone_entity::schema::{
    FILE_FOLDER_FIELD, FILE_TABLE, FOLDER_PARENT_FIELD, FOLDER_TABLE, NAME_FIELD,
};

use crate::records;

/// Manages folder CRUD operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Record store client.
    client: Arc<dyn RecordClient>,
    /// Source of default timestamps.
    clock: Arc<dyn Clock>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(client: Arc<dyn RecordClient>, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    /// Lists direct children of a folder (`None` = root-level folders),
    /// optionally narrowed by name. Ordered by name.
    pub async fn list(
        &self,
        parent_id: Option<FolderId>,
        search: Option<&str>,
    ) -> AppResult<Vec<Folder>> {
        self.try_list(parent_id, search).await.inspect_err(
            |e| error!(table = FOLDER_TABLE.name, error = %e, "Error fetching folders"),
        )
    }

    async fn try_list(
        &self,
        parent_id: Option<FolderId>,
        search: Option<&str>,
    ) -> AppResult<Vec<Folder>> {
        let parent_condition = match parent_id {
            Some(id) => WhereCondition::exact(FOLDER_PARENT_FIELD, id.to_string()),
            None => WhereCondition::unset(FOLDER_PARENT_FIELD),
        };
        let mut query = FetchQuery::new(FOLDER_TABLE.all_fields.iter().copied())
            .with_condition(parent_condition)
            .with_order(OrderBy::asc(NAME_FIELD));
        if let Some(text) = search.map(str::trim).filter(|t| !t.is_empty()) {
            query = query.with_condition(WhereCondition::contains(NAME_FIELD, text));
        }

        let folders = self.fetch(&query).await?;
        debug!(parent_id = ?parent_id, count = folders.len(), "Listed folders");
        Ok(folders)
    }

    /// Gets a folder by ID. A missing folder is `Ok(None)`.
    pub async fn get_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        self.try_get(id)
            .await
            .inspect_err(|e| {
                error!(
                    table = FOLDER_TABLE.name,
                    folder_id = %id,
                    error = %e,
                    "Error fetching folder"
                )
            })
    }

    async fn try_get(&self, id: FolderId) -> AppResult<Option<Folder>> {
        let resp = self
            .client
            .get_record_by_id(FOLDER_TABLE.name, &id.to_string(), &FOLDER_TABLE.field_list())
            .await?;
        if !resp.success {
            return Err(AppError::backend(
                resp.message
                    .unwrap_or_else(|| format!("Failed to fetch folder {id}")),
            ));
        }
        resp.data
            .map(|r| records::decode(r, FOLDER_TABLE.name, Folder::from_record))
            .transpose()
    }

    /// Creates a folder.
    ///
    /// The name is required. Missing values default to: created now, not
    /// public, zero files.
    pub async fn create(&self, input: FolderInput) -> AppResult<Folder> {
        self.try_create(input).await.inspect_err(
            |e| error!(table = FOLDER_TABLE.name, error = %e, "Error creating folder"),
        )
    }

    async fn try_create(&self, mut input: FolderInput) -> AppResult<Folder> {
        if input.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Folder name is required"));
        }
        if let Some(Some(parent_id)) = input.parent_id {
            self.require(parent_id).await?;
        }

        input.created_date.get_or_insert_with(|| self.clock.now());
        input.is_public.get_or_insert(false);
        input.file_count.get_or_insert(0);

        let resp = self
            .client
            .create_records(FOLDER_TABLE.name, vec![input.to_record()?])
            .await?;
        let record = records::single_result(resp, "Failed to create folder")?;
        let folder = records::decode(record, FOLDER_TABLE.name, Folder::from_record)?;

        info!(
            folder_id = %folder.id,
            name = %folder.name,
            parent_id = ?folder.parent_id,
            "Folder created"
        );

        Ok(folder)
    }

    /// Updates the given fields of a folder.
    ///
    /// A new parent must exist and must not be the folder itself or one of
    /// its descendants.
    pub async fn update(&self, id: FolderId, input: FolderInput) -> AppResult<Folder> {
        self.try_update(id, input)
            .await
            .inspect_err(|e| {
                error!(
                    table = FOLDER_TABLE.name,
                    folder_id = %id,
                    error = %e,
                    "Error updating folder"
                )
            })
    }

    async fn try_update(&self, id: FolderId, input: FolderInput) -> AppResult<Folder> {
        if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if let Some(Some(parent_id)) = input.parent_id {
            self.ensure_acyclic(id, parent_id).await?;
        }

        let mut record = input.to_record()?;
        record.insert(ID_FIELD.to_string(), id.to_string().into());

        let resp = self
            .client
            .update_records(FOLDER_TABLE.name, vec![record])
            .await?;
        let record = records::single_result(resp, "Failed to update folder")?;
        let folder = records::decode(record, FOLDER_TABLE.name, Folder::from_record)?;

        info!(folder_id = %id, "Folder updated");
        Ok(folder)
    }

    /// Deletes one or more folders in a single batched call.
    ///
    /// Fails with a conflict while any target still contains files or
    /// folders outside the batch.
    pub async fn delete(&self, ids: impl Into<IdBatch<FolderId>>) -> AppResult<bool> {
        let ids = ids.into();
        self.try_delete(&ids)
            .await
            .inspect_err(|e| {
                error!(
                    table = FOLDER_TABLE.name,
                    count = ids.len(),
                    error = %e,
                    "Error deleting folders"
                )
            })
    }

    async fn try_delete(&self, ids: &IdBatch<FolderId>) -> AppResult<bool> {
        if ids.is_empty() {
            return Ok(true);
        }
        self.ensure_empty(ids.as_slice()).await?;

        let record_ids: Vec<String> = ids.as_slice().iter().map(ToString::to_string).collect();
        let resp = self
            .client
            .delete_records(FOLDER_TABLE.name, &record_ids)
            .await?;
        let ok = records::deleted(resp, "Failed to delete folders")?;

        info!(count = ids.len(), "Folders deleted");
        Ok(ok)
    }

    /// Renames a folder.
    pub async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        self.update(id, FolderInput::named(name)).await
    }

    /// Moves a folder under another parent (`None` = root).
    pub async fn move_to(&self, id: FolderId, parent_id: Option<FolderId>) -> AppResult<Folder> {
        self.update(id, FolderInput::default().under(parent_id))
            .await
    }

    /// The chain from the root-level ancestor down to `id`, inclusive.
    pub async fn ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        self.try_ancestors(id)
            .await
            .inspect_err(|e| {
                error!(
                    table = FOLDER_TABLE.name,
                    folder_id = %id,
                    error = %e,
                    "Error resolving folder path"
                )
            })
    }

    async fn try_ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(id);

        while let Some(current) = next {
            if !visited.insert(current) {
                return Err(AppError::backend(format!(
                    "Folder {current} is part of a parent cycle"
                )));
            }
            let Some(folder) = self.try_get(current).await? else {
                if current == id {
                    return Err(AppError::not_found(format!("Folder {id} not found")));
                }
                warn!(folder_id = %current, "Dangling parent reference");
                break;
            };
            next = folder.parent_id;
            chain.push(folder);
        }

        chain.reverse();
        Ok(chain)
    }

    /// Recount the files directly inside a folder and store the result.
    pub async fn refresh_file_count(&self, id: FolderId) -> AppResult<Folder> {
        let count = records::count(
            self.client.as_ref(),
            FILE_TABLE.name,
            vec![WhereCondition::exact(FILE_FOLDER_FIELD, id.to_string())],
        )
        .await
        .inspect_err(|e| {
            error!(
                table = FILE_TABLE.name,
                folder_id = %id,
                error = %e,
                "Error counting files"
            )
        })?;

        let input = FolderInput {
            file_count: Some(count),
            ..FolderInput::default()
        };
        let folder = self.update(id, input).await?;
        debug!(folder_id = %id, file_count = count, "Refreshed file count");
        Ok(folder)
    }

    async fn fetch(&self, query: &FetchQuery) -> AppResult<Vec<Folder>> {
        let resp = self.client.fetch_records(FOLDER_TABLE.name, query).await?;
        let rows = records::fetched(resp, FOLDER_TABLE.name)?;
        Ok(records::decode_rows(rows, FOLDER_TABLE.name, Folder::from_record))
    }

    async fn require(&self, id: FolderId) -> AppResult<Folder> {
        self.try_get(id)
            .await?
            .ok_or_else(|| AppError::validation(format!("Folder {id} does not exist")))
    }

    /// Reject a parent that is `id` itself or sits below it.
    async fn ensure_acyclic(&self, id: FolderId, parent_id: FolderId) -> AppResult<()> {
        let mut visited = HashSet::new();
        let mut current = self.require(parent_id).await?;

        loop {
            if current.id == id {
                return Err(AppError::validation(format!(
                    "Cannot move folder {id} into itself or one of its descendants"
                )));
            }
            if !visited.insert(current.id) {
                return Err(AppError::backend(format!(
                    "Folder {} is part of a parent cycle",
                    current.id
                )));
            }
            let Some(next) = current.parent_id else {
                return Ok(());
            };
            match self.try_get(next).await? {
                Some(folder) => current = folder,
                None => return Ok(()),
            }
        }
    }

    async fn ensure_empty(&self, ids: &[FolderId]) -> AppResult<()> {
        let targets: HashSet<String> = ids.iter().map(ToString::to_string).collect();
        let query = FetchQuery::new([ID_FIELD]).with_condition(WhereCondition::new(
            FOLDER_PARENT_FIELD,
            FilterOperator::ExactMatch,
            records::id_values(ids),
        ));
        let resp = self.client.fetch_records(FOLDER_TABLE.name, &query).await?;
        // Raw rows: a child that does not decode still blocks the delete.
        let outside = records::fetched(resp, FOLDER_TABLE.name)?
            .iter()
            .filter(|child| {
                child
                    .get(ID_FIELD)
                    .and_then(|v| v.as_str())
                    .is_none_or(|id| !targets.contains(id))
            })
            .count();
        if outside > 0 {
            warn!(subfolders = outside, "Refusing to delete folders with subfolders");
            return Err(AppError::conflict("Folder is not empty: it contains subfolders"));
        }

        let files = records::count(
            self.client.as_ref(),
            FILE_TABLE.name,
            vec![WhereCondition::new(
                FILE_FOLDER_FIELD,
                FilterOperator::ExactMatch,
                records::id_values(ids),
            )],
        )
        .await?;
        if files > 0 {
            warn!(files, "Refusing to delete folders with files");
            return Err(AppError::conflict("Folder is not empty: it contains files"));
        }
        Ok(())
    }
}
