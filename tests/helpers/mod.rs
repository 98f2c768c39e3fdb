//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use dropzone_core::config::{AppConfig, BrowserConfig};
use dropzone_core::traits::{ManualClock, NotificationQueue, RecordClient};
use dropzone_service::upload::FixedProgress;
use dropzone_service::{Browser, FileDraft, FileService, FolderService};
use dropzone_store::MemoryRecordClient;

/// Test application context
pub struct TestApp {
    /// Backing store, shared with every service
    pub store: MemoryRecordClient,
    /// File service over the store
    pub files: FileService,
    /// Folder service over the store
    pub folders: FolderService,
    /// Clock pinned to a fixed instant
    pub clock: Arc<ManualClock>,
    /// Notifications raised by browsers built from this app
    pub queue: Arc<NotificationQueue>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application with an empty store
    pub fn new() -> Self {
        let store = MemoryRecordClient::new();
        let client: Arc<dyn RecordClient> = Arc::new(store.clone());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        ));
        Self {
            files: FileService::new(client.clone(), clock.clone()),
            folders: FolderService::new(client, clock.clone()),
            store,
            clock,
            queue: Arc::new(NotificationQueue::new()),
            config: AppConfig::default(),
        }
    }

    /// A browser over the same store. Uploads advance 20% per tick.
    pub fn browser(&self) -> Browser {
        self.browser_with(self.config.browser.clone())
    }

    /// A browser with custom session defaults.
    pub fn browser_with(&self, config: BrowserConfig) -> Browser {
        Browser::new(
            self.files.clone(),
            self.folders.clone(),
            self.queue.clone(),
            config,
            &self.config.upload,
        )
        .with_progress_source(FixedProgress(20.0))
    }

    /// Messages raised since the last call.
    pub fn messages(&self) -> Vec<String> {
        self.queue.drain().into_iter().map(|n| n.message).collect()
    }
}

/// A plain-text draft with an in-memory locator.
pub fn draft(name: &str, size: u64) -> FileDraft {
    FileDraft::new(name, size, "text/plain").with_url(format!("memory://{name}"))
}
