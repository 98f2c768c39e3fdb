//! Table and JSON output for the interactive shell.

use chrono::Utc;
use serde::Serialize;
use tabled::{Table, Tabled};

use dropzone_core::traits::{Notification, NotificationLevel};
use dropzone_entity::file::File;
use dropzone_entity::folder::Folder;
use dropzone_service::{FileKind, StorageUsage, UploadEntry, format_file_size, format_relative};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
pub struct FileRow {
    /// Selection marker
    #[tabled(rename = " ")]
    pub selected: String,
    /// Name
    pub name: String,
    /// Kind
    pub kind: String,
    /// Size
    pub size: String,
    /// Uploaded
    pub uploaded: String,
    /// Public
    pub public: bool,
}

impl FileRow {
    /// Row for a file.
    pub fn new(file: &File, selected: bool) -> Self {
        Self {
            selected: if selected { "✓" } else { "" }.to_string(),
            name: file.name.clone(),
            kind: FileKind::from_mime(&file.mime_type).to_string(),
            size: format_file_size(file.size),
            uploaded: format_relative(file.upload_date, Utc::now()),
            public: file.is_public,
        }
    }
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
pub struct FolderRow {
    /// Name
    pub name: String,
    /// Cached file count
    pub files: u64,
    /// Created
    pub created: String,
}

impl FolderRow {
    /// Row for a folder.
    pub fn new(folder: &Folder) -> Self {
        Self {
            name: format!("{}/", folder.name),
            files: folder.file_count,
            created: format_relative(folder.created_date, Utc::now()),
        }
    }
}

/// Upload display row
#[derive(Debug, Serialize, Tabled)]
pub struct UploadRow {
    /// File name
    pub name: String,
    /// Progress
    pub progress: String,
    /// Phase
    pub phase: String,
}

impl UploadRow {
    /// Row for an upload.
    pub fn new(entry: &UploadEntry) -> Self {
        Self {
            name: entry.draft.name.clone(),
            progress: format!("{}%", entry.percent()),
            phase: format!("{:?}", entry.phase),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single item as JSON
pub fn print_json<T: Serialize>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
    println!("{json}");
}

/// Print the storage meter
pub fn print_usage(usage: StorageUsage) {
    println!(
        "{} of {} used ({:.1}%) • Free: {}",
        format_file_size(usage.used),
        format_file_size(usage.quota),
        usage.percent(),
        format_file_size(usage.free())
    );
}

/// Print a notification
pub fn print_notification(notification: &Notification) {
    match notification.level {
        NotificationLevel::Success => print_success(&notification.message),
        NotificationLevel::Info => println!("ℹ {}", notification.message),
        NotificationLevel::Error => print_error(&notification.message),
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
