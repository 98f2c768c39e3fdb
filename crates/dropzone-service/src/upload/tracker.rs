//! Drives simulated uploads and stores them on completion.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time;
use tracing::{debug, info, warn};

use dropzone_core::config::UploadConfig;
use dropzone_core::traits::{Notification, Notifier};
use dropzone_core::types::UploadId;

use crate::file::FileService;
use crate::folder::FolderService;
use crate::library::SharedLibrary;

use super::draft::FileDraft;
use super::progress::{ProgressSource, RandomProgress};
use super::state::{UploadEntry, UploadPhase};

/// Tracks in-flight uploads.
///
/// Every accepted upload runs on its own task, ticking on a fixed
/// interval. Each tick updates only that upload's slot, under one lock
/// acquisition. There is no cancellation, retry, or concurrency limit.
#[derive(Debug, Clone)]
pub struct UploadTracker {
    /// Visible uploads by id.
    entries: Arc<Mutex<HashMap<UploadId, UploadEntry>>>,
    /// Where finished files are appended.
    library: SharedLibrary,
    /// Stores finished files.
    files: FileService,
    /// Refreshes folder file counts.
    folders: FolderService,
    /// User-facing notifications.
    notifier: Arc<dyn Notifier>,
    /// Shared increment generator.
    source: Arc<Mutex<Box<dyn ProgressSource>>>,
    /// Time between ticks.
    tick_interval: Duration,
    /// Time a finished upload stays visible.
    clear_delay: Duration,
    /// Largest accepted increment per tick.
    max_increment: f64,
    /// Start order counter.
    next_seq: Arc<AtomicU64>,
    /// Signalled whenever the last entry is cleared.
    idle: Arc<Notify>,
}

impl UploadTracker {
    /// Creates a tracker with random progress as configured.
    pub fn new(
        files: FileService,
        folders: FolderService,
        library: SharedLibrary,
        notifier: Arc<dyn Notifier>,
        config: &UploadConfig,
    ) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            library,
            files,
            folders,
            notifier,
            source: Arc::new(Mutex::new(Box::new(RandomProgress::new(
                config.max_increment,
                config.seed,
            )))),
            tick_interval: config.tick_interval(),
            clear_delay: config.clear_delay(),
            max_increment: config.max_increment.max(0.0),
            next_seq: Arc::new(AtomicU64::new(0)),
            idle: Arc::new(Notify::new()),
        }
    }

    /// Replace the increment generator.
    pub fn with_source(mut self, source: impl ProgressSource) -> Self {
        self.source = Arc::new(Mutex::new(Box::new(source)));
        self
    }

    /// Accept an upload and start ticking it. Must be called inside a
    /// tokio runtime.
    pub fn start(&self, draft: FileDraft) -> UploadId {
        let id = UploadId::new();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let name = draft.name.clone();
        self.lock_entries()
            .insert(id, UploadEntry::new(id, draft, seq));

        debug!(upload_id = %id, name = %name, "Upload accepted");
        tokio::spawn(self.clone().run(id));
        id
    }

    /// Visible uploads, oldest first.
    pub fn snapshot(&self) -> Vec<UploadEntry> {
        let mut entries: Vec<UploadEntry> = self.lock_entries().values().cloned().collect();
        entries.sort_by_key(|e| e.seq);
        entries
    }

    /// One visible upload.
    pub fn get(&self, id: UploadId) -> Option<UploadEntry> {
        self.lock_entries().get(&id).cloned()
    }

    /// Whether no upload is visible.
    pub fn is_idle(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// Resolve once every upload has finished and been cleared.
    pub async fn wait_idle(&self) {
        loop {
            let cleared = self.idle.notified();
            if self.is_idle() {
                return;
            }
            cleared.await;
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<UploadId, UploadEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_increment(&self) -> f64 {
        let raw = self
            .source
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .next_increment();
        raw.clamp(0.0, self.max_increment)
    }

    async fn run(self, id: UploadId) {
        let mut ticker = time::interval(self.tick_interval);
        // The first tick fires immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let increment = self.next_increment();
            let phase = {
                let mut entries = self.lock_entries();
                let Some(entry) = entries.get_mut(&id) else {
                    return;
                };
                let phase = entry.advance(increment);
                debug!(upload_id = %id, progress = entry.progress, "Upload tick");
                phase
            };
            if !phase.is_active() {
                break;
            }
        }

        self.store(id).await;
        time::sleep(self.clear_delay).await;
        self.clear(id);
    }

    async fn store(&self, id: UploadId) {
        let Some(draft) = self.get(id).map(|e| e.draft) else {
            return;
        };

        match self.files.create(draft.to_input()).await {
            Ok(mut file) => {
                file.upload_progress = Some(100);
                let folder_id = file.folder_id;
                info!(upload_id = %id, file_id = %file.id, name = %file.name, "Upload stored");
                self.library.with(|lib| lib.files.push(file));

                if let Some(folder_id) = folder_id {
                    match self.folders.refresh_file_count(folder_id).await {
                        Ok(folder) => self.library.with(|lib| lib.upsert_folder(folder)),
                        Err(e) => {
                            warn!(folder_id = %folder_id, error = %e, "File count not refreshed")
                        }
                    }
                }
                self.notifier.notify(Notification::success(format!(
                    "{} uploaded successfully!",
                    draft.name
                )));
            }
            Err(e) => {
                if let Some(entry) = self.lock_entries().get_mut(&id) {
                    entry.fail();
                }
                warn!(upload_id = %id, name = %draft.name, error = %e, "Upload not stored");
                self.notifier.notify(Notification::error(format!(
                    "Failed to upload {}: {}",
                    draft.name, e.message
                )));
            }
        }
    }

    fn clear(&self, id: UploadId) {
        let mut entries = self.lock_entries();
        if let Some(mut entry) = entries.remove(&id) {
            let outcome = entry.phase;
            entry.phase = UploadPhase::Cleared;
            debug!(upload_id = %id, outcome = ?outcome, "Upload cleared");
        }
        if entries.is_empty() {
            self.idle.notify_waiters();
        }
    }
}
