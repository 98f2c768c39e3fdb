//! # dropzone-entity
//!
//! Domain entity models for DropZone. Every entity maps one-to-one onto a
//! record-store table row; field names on the wire follow the table
//! schema (`Name`, `folder_id`, ...). The `*Input` structs are the typed
//! allow-lists: they contain exactly the fields a client may write.

pub mod audit;
pub mod file;
pub mod folder;
pub mod schema;

mod serde_helpers;

pub use audit::AuditInfo;
pub use file::{File, FileInput};
pub use folder::{Breadcrumb, Folder, FolderInput, FolderPath};
pub use schema::{FILE_TABLE, FOLDER_TABLE, TableSchema};
