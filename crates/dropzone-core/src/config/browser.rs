//! Browser session defaults.

use serde::{Deserialize, Serialize};

use crate::types::{SortBy, ViewMode};

/// Initial state of a browser session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Folders created at root on first load when the root is empty.
    #[serde(default = "default_folders")]
    pub default_folders: Vec<String>,
    /// Initial sort key.
    #[serde(default)]
    pub sort: SortBy,
    /// Initial view mode.
    #[serde(default)]
    pub view: ViewMode,
    /// Capacity shown by the storage meter, in bytes.
    #[serde(default = "default_quota")]
    pub storage_quota_bytes: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            default_folders: default_folders(),
            sort: SortBy::default(),
            view: ViewMode::default(),
            storage_quota_bytes: default_quota(),
        }
    }
}

fn default_folders() -> Vec<String> {
    ["Documents", "Images", "Projects"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_quota() -> u64 {
    5 * 1024 * 1024 * 1024
}
