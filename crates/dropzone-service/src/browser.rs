//! Session state for browsing, uploading, and organizing files.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use dropzone_core::config::{BrowserConfig, UploadConfig};
use dropzone_core::error::AppError;
use dropzone_core::result::AppResult;
use dropzone_core::traits::{Notification, Notifier};
use dropzone_core::types::{FileId, FolderId, SortBy, UploadId, ViewMode};
use dropzone_entity::file::File;
use dropzone_entity::folder::{Folder, FolderInput, FolderPath};

use crate::file::FileService;
use crate::folder::FolderService;
use crate::library::{Library, SharedLibrary};
use crate::listing;
use crate::upload::{FileDraft, ProgressSource, UploadEntry, UploadTracker};

/// Title shown at the root.
pub const ROOT_TITLE: &str = "My Files";

/// Storage used against the configured quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StorageUsage {
    /// Bytes used by all loaded files.
    pub used: u64,
    /// Configured capacity.
    pub quota: u64,
}

impl StorageUsage {
    /// Bytes left, never negative.
    pub fn free(&self) -> u64 {
        self.quota.saturating_sub(self.used)
    }

    /// Share of the quota in use, `0.0..=100.0`.
    pub fn percent(&self) -> f64 {
        if self.quota == 0 {
            return 100.0;
        }
        (self.used as f64 / self.quota as f64 * 100.0).min(100.0)
    }
}

/// A browsing session over the file store.
///
/// Holds the loaded files and folders, the current folder, view flags,
/// the selection, and the upload tracker. Mutations go through the
/// services first and are mirrored locally only when they succeed.
#[derive(Debug)]
pub struct Browser {
    files: FileService,
    folders: FolderService,
    library: SharedLibrary,
    uploads: UploadTracker,
    notifier: Arc<dyn Notifier>,
    config: BrowserConfig,
    current: Option<FolderId>,
    search: String,
    sort: SortBy,
    view: ViewMode,
    selection: HashSet<FileId>,
}

impl Browser {
    /// Creates a session at the root with the configured sort and view.
    pub fn new(
        files: FileService,
        folders: FolderService,
        notifier: Arc<dyn Notifier>,
        config: BrowserConfig,
        upload: &UploadConfig,
    ) -> Self {
        let library = SharedLibrary::new();
        let uploads = UploadTracker::new(
            files.clone(),
            folders.clone(),
            library.clone(),
            notifier.clone(),
            upload,
        );
        Self {
            files,
            folders,
            library,
            uploads,
            notifier,
            sort: config.sort,
            view: config.view,
            config,
            current: None,
            search: String::new(),
            selection: HashSet::new(),
        }
    }

    /// Replace the upload progress generator.
    pub fn with_progress_source(mut self, source: impl ProgressSource) -> Self {
        self.uploads = self.uploads.with_source(source);
        self
    }

    // ── Loading and navigation ───────────────────────────────────────

    /// Fetch every folder reachable from the root and the files inside
    /// them. An empty root is seeded with the default folders.
    pub async fn load(&mut self) -> AppResult<()> {
        let mut roots = self.folders.list(None, None).await?;
        let root_files = self.files.list(None, None).await?;

        if roots.is_empty() && root_files.is_empty() {
            for name in &self.config.default_folders {
                let folder = self.folders.create(FolderInput::named(name.as_str())).await?;
                roots.push(folder);
            }
            info!(count = roots.len(), "Seeded default folders");
        }

        let mut library = Library {
            files: root_files,
            folders: Vec::new(),
        };
        let mut queue: VecDeque<Folder> = roots.into();
        let mut seen = HashSet::new();
        while let Some(folder) = queue.pop_front() {
            if !seen.insert(folder.id) {
                continue;
            }
            library
                .files
                .extend(self.files.list(Some(folder.id), None).await?);
            queue.extend(self.folders.list(Some(folder.id), None).await?);
            library.folders.push(folder);
        }

        info!(
            folders = library.folders.len(),
            files = library.files.len(),
            "Library loaded"
        );

        if self.current.is_some_and(|id| library.folder(id).is_none()) {
            self.current = None;
        }
        self.selection
            .retain(|id| library.files.iter().any(|f| f.id == *id));
        *self.library.lock() = library;
        Ok(())
    }

    /// Enter a loaded folder.
    pub fn open(&mut self, folder_id: FolderId) -> AppResult<()> {
        if self.library.lock().folder(folder_id).is_none() {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        debug!(folder_id = %folder_id, "Opened folder");
        self.current = Some(folder_id);
        Ok(())
    }

    /// Return to the root.
    pub fn go_home(&mut self) {
        self.current = None;
    }

    /// Move to the parent folder. Returns `false` at the root.
    pub fn go_up(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        self.current = self.library.lock().folder(current).and_then(|f| f.parent_id);
        true
    }

    /// The folder being viewed (`None` = root).
    pub fn current_folder(&self) -> Option<FolderId> {
        self.current
    }

    /// Details of the folder being viewed.
    pub fn current_folder_info(&self) -> Option<Folder> {
        let id = self.current?;
        self.library.lock().folder(id).cloned()
    }

    /// Heading for the current view.
    pub fn title(&self) -> String {
        self.current_folder_info()
            .map(|f| f.name)
            .unwrap_or_else(|| ROOT_TITLE.to_string())
    }

    /// Home followed by the ancestor chain of the current folder.
    pub async fn breadcrumbs(&self) -> AppResult<FolderPath> {
        match self.current {
            None => Ok(FolderPath::root()),
            Some(id) => {
                let chain = self.folders.ancestors(id).await?;
                Ok(FolderPath::from_ancestors(&chain))
            }
        }
    }

    // ── View state ───────────────────────────────────────────────────

    /// Filter visible files by name.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Current search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Change the file ordering.
    pub fn set_sort(&mut self, sort: SortBy) {
        self.sort = sort;
    }

    /// Current file ordering.
    pub fn sort(&self) -> SortBy {
        self.sort
    }

    /// Change the layout.
    pub fn set_view_mode(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Switch between grid and list. Returns the new mode.
    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view = self.view.toggled();
        self.view
    }

    /// Current layout.
    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    // ── Listings ─────────────────────────────────────────────────────

    /// Files in the current folder matching the search, in sort order.
    pub fn visible_files(&self) -> Vec<File> {
        listing::filter_and_sort(
            &self.library.lock().files,
            self.current,
            &self.search,
            self.sort,
        )
    }

    /// Folders directly inside the current folder, by name.
    pub fn visible_folders(&self) -> Vec<Folder> {
        listing::child_folders(&self.library.lock().folders, self.current)
    }

    /// `"{n} files • {m} folders"` for the current view.
    pub fn summary(&self) -> String {
        format!(
            "{} files • {} folders",
            self.visible_files().len(),
            self.visible_folders().len()
        )
    }

    /// A visible file by exact name.
    pub fn file_named(&self, name: &str) -> Option<File> {
        self.visible_files().into_iter().find(|f| f.name == name)
    }

    /// A visible folder by exact name.
    pub fn folder_named(&self, name: &str) -> Option<Folder> {
        self.visible_folders().into_iter().find(|f| f.name == name)
    }

    /// Bytes used by every loaded file against the quota.
    pub fn storage_usage(&self) -> StorageUsage {
        StorageUsage {
            used: self.library.lock().used_bytes(),
            quota: self.config.storage_quota_bytes,
        }
    }

    // ── Uploads ──────────────────────────────────────────────────────

    /// Start uploading drafts into the current folder.
    pub fn upload(&self, drafts: impl IntoIterator<Item = FileDraft>) -> Vec<UploadId> {
        drafts
            .into_iter()
            .map(|draft| self.uploads.start(draft.in_folder(self.current)))
            .collect()
    }

    /// Uploads still visible, oldest first.
    pub fn uploads(&self) -> Vec<UploadEntry> {
        self.uploads.snapshot()
    }

    /// Resolve once every upload has finished and been cleared.
    pub async fn wait_for_uploads(&self) {
        self.uploads.wait_idle().await;
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Flip a file's selection. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, id: FileId) -> bool {
        if self.selection.remove(&id) {
            false
        } else {
            self.selection.insert(id);
            true
        }
    }

    /// Select every visible file. Returns the selection size.
    pub fn select_all_visible(&mut self) -> usize {
        self.selection
            .extend(self.visible_files().into_iter().map(|f| f.id));
        self.selection.len()
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Whether a file is selected.
    pub fn is_selected(&self, id: FileId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected files, in collection order.
    pub fn selected(&self) -> Vec<File> {
        self.library
            .lock()
            .files
            .iter()
            .filter(|f| self.selection.contains(&f.id))
            .cloned()
            .collect()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Delete every selected file in one batch. Returns how many were
    /// deleted; nothing selected is a no-op.
    pub async fn delete_selected(&mut self) -> AppResult<usize> {
        if self.selection.is_empty() {
            return Ok(0);
        }
        let ids: Vec<FileId> = self.selection.iter().copied().collect();
        let count = ids.len();

        if let Err(e) = self.files.delete(ids).await {
            self.notifier
                .notify(Notification::error(format!("Failed to delete files: {}", e.message)));
            return Err(e);
        }

        let touched = self.library.with(|lib| lib.remove_files(&self.selection));
        self.selection.clear();
        for folder_id in touched.into_iter().flatten() {
            self.refresh_count(folder_id).await;
        }

        info!(count, "Deleted selected files");
        self.notifier.notify(Notification::success(format!(
            "{count} file(s) deleted successfully!"
        )));
        Ok(count)
    }

    /// Create a folder inside the current folder. Blank names are
    /// ignored and yield `None`.
    pub async fn create_folder(&mut self, name: &str) -> AppResult<Option<Folder>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let input = FolderInput::named(name).under(self.current);
        let folder = match self.folders.create(input).await {
            Ok(folder) => folder,
            Err(e) => {
                self.notifier.notify(Notification::error(format!(
                    "Failed to create folder: {}",
                    e.message
                )));
                return Err(e);
            }
        };

        self.library.with(|lib| lib.folders.push(folder.clone()));
        self.notifier.notify(Notification::success(format!(
            "Folder \"{name}\" created successfully!"
        )));
        Ok(Some(folder))
    }

    /// Delete an empty folder. Leaving the deleted folder moves the view
    /// to its parent.
    pub async fn delete_folder(&mut self, id: FolderId) -> AppResult<()> {
        let folder = self
            .library
            .lock()
            .folder(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        if let Err(e) = self.folders.delete(id).await {
            self.notifier.notify(Notification::error(format!(
                "Cannot delete \"{}\": {}",
                folder.name, e.message
            )));
            return Err(e);
        }

        self.library.with(|lib| lib.remove_folder(id));
        if self.current == Some(id) {
            self.current = folder.parent_id;
        }
        self.notifier.notify(Notification::success(format!(
            "Folder \"{}\" deleted successfully!",
            folder.name
        )));
        Ok(())
    }

    /// The file's content locator, announced as copied.
    pub fn share_link(&self, file_id: FileId) -> AppResult<String> {
        let url = self
            .library
            .lock()
            .file(file_id)
            .map(|f| f.url.clone())
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;
        if url.is_empty() {
            return Err(AppError::validation("File has no shareable link"));
        }
        self.notifier
            .notify(Notification::info("Share link copied to clipboard!"));
        Ok(url)
    }

    async fn refresh_count(&self, folder_id: FolderId) {
        match self.folders.refresh_file_count(folder_id).await {
            Ok(folder) => self.library.with(|lib| lib.upsert_folder(folder)),
            Err(e) => warn!(folder_id = %folder_id, error = %e, "File count not refreshed"),
        }
    }
}
