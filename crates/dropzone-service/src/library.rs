//! The session's in-memory copy of files and folders.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use dropzone_core::types::{FileId, FolderId};
use dropzone_entity::file::File;
use dropzone_entity::folder::Folder;

/// Files and folders loaded into a session.
#[derive(Debug, Clone, Default)]
pub struct Library {
    /// Files, in the order they were loaded or uploaded.
    pub files: Vec<File>,
    /// Folders, in the order they were loaded or created.
    pub folders: Vec<Folder>,
}

impl Library {
    /// Look up a folder.
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Look up a file.
    pub fn file(&self, id: FileId) -> Option<&File> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Replace a folder in place, or append it if unknown.
    pub fn upsert_folder(&mut self, folder: Folder) {
        match self.folders.iter_mut().find(|f| f.id == folder.id) {
            Some(slot) => *slot = folder,
            None => self.folders.push(folder),
        }
    }

    /// Drop the given files, returning the folders they were in.
    pub fn remove_files(&mut self, ids: &HashSet<FileId>) -> HashSet<Option<FolderId>> {
        let mut touched = HashSet::new();
        self.files.retain(|f| {
            if ids.contains(&f.id) {
                touched.insert(f.folder_id);
                false
            } else {
                true
            }
        });
        touched
    }

    /// Drop a folder.
    pub fn remove_folder(&mut self, id: FolderId) {
        self.folders.retain(|f| f.id != id);
    }

    /// Total bytes across all files.
    pub fn used_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// A [`Library`] shared between the browser and its upload tasks.
///
/// Critical sections never span an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedLibrary(Arc<Mutex<Library>>);

impl SharedLibrary {
    /// Create an empty shared library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the library.
    pub fn lock(&self) -> MutexGuard<'_, Library> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a closure against the locked library.
    pub fn with<R>(&self, f: impl FnOnce(&mut Library) -> R) -> R {
        f(&mut self.lock())
    }
}
