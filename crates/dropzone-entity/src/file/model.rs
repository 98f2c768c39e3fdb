//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use dropzone_core::types::{FileId, FolderId, Record};

use crate::audit::AuditInfo;
use crate::serde_helpers;

/// A file record in the `file1` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// Unique file identifier.
    #[serde(rename = "Id")]
    pub id: FileId,
    /// Display name, including extension.
    #[serde(rename = "Name")]
    pub name: String,
    /// Free-form tags.
    #[serde(rename = "Tags", default, deserialize_with = "serde_helpers::tags")]
    pub tags: Vec<String>,
    /// Owner reference.
    #[serde(rename = "Owner", default)]
    pub owner: Option<String>,
    /// Server-managed audit columns.
    #[serde(flatten)]
    pub audit: AuditInfo,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// MIME type.
    #[serde(rename = "type", default)]
    pub mime_type: String,
    /// When the upload completed.
    pub upload_date: DateTime<Utc>,
    /// Last modification time of the source file.
    pub last_modified: DateTime<Utc>,
    /// Content locator.
    #[serde(default)]
    pub url: String,
    /// Thumbnail locator, for images.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Whether the file is publicly visible.
    #[serde(default)]
    pub is_public: bool,
    /// Owning folder; `None` means root.
    #[serde(default, deserialize_with = "serde_helpers::optional_id")]
    pub folder_id: Option<FolderId>,
    /// Transient upload progress (0-100). Never persisted.
    #[serde(skip)]
    pub upload_progress: Option<u8>,
}

impl File {
    /// Decode a file from a backend record.
    pub fn from_record(record: Record) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(record))
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }

    /// Whether the file sits directly under the given folder (`None` = root).
    pub fn is_in(&self, folder: Option<FolderId>) -> bool {
        self.folder_id == folder
    }
}

/// Client-writable file fields.
///
/// Only fields that are `Some` are forwarded. Identity and audit fields do
/// not exist here, so they can never be written by a client. For the
/// nullable references, `Some(None)` writes an explicit null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInput {
    /// Display name.
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tags.
    #[serde(rename = "Tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Owner reference.
    #[serde(rename = "Owner", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// MIME type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Upload timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<DateTime<Utc>>,
    /// Last-modified timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Content locator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Thumbnail locator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<Option<String>>,
    /// Public visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    /// Owning folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Option<FolderId>>,
}

impl FileInput {
    /// Start an input with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the owning folder (`None` = root).
    pub fn in_folder(mut self, folder_id: Option<FolderId>) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    /// Encode the set fields as a backend record.
    pub fn to_record(&self) -> Result<Record, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Record::new()),
        }
    }
}

impl From<&File> for FileInput {
    /// Copy every client-writable field of an existing file.
    fn from(file: &File) -> Self {
        Self {
            name: Some(file.name.clone()),
            tags: Some(file.tags.clone()),
            owner: file.owner.clone(),
            size: Some(file.size),
            mime_type: Some(file.mime_type.clone()),
            upload_date: Some(file.upload_date),
            last_modified: Some(file.last_modified),
            url: Some(file.url.clone()),
            thumbnail_url: Some(file.thumbnail_url.clone()),
            is_public: Some(file.is_public),
            folder_id: Some(file.folder_id),
        }
    }
}
