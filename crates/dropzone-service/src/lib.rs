//! # dropzone-service
//!
//! Business logic service layer for DropZone. [`FileService`] and
//! [`FolderService`] translate typed operations into record-store calls;
//! [`Browser`] holds a session's state and drives the simulated upload
//! pipeline.
//!
//! Services follow constructor injection: the record client and clock are
//! provided at construction time via `Arc` references.

pub mod browser;
pub mod file;
pub mod folder;
pub mod format;
pub mod library;
pub mod listing;
pub mod upload;

mod records;

pub use browser::{Browser, StorageUsage};
pub use file::FileService;
pub use folder::FolderService;
pub use format::{FileKind, format_file_size, format_relative};
pub use library::{Library, SharedLibrary};
pub use upload::{FileDraft, UploadEntry, UploadPhase, UploadTracker};
