//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use dropzone_core::types::{FolderId, Record};

use crate::audit::AuditInfo;
use crate::serde_helpers;

/// A folder record in the `folder1` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    #[serde(rename = "Id")]
    pub id: FolderId,
    /// Folder name.
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
    /// Cached number of files directly inside this folder.
    #[serde(default)]
    pub file_count: u64,
    /// When the folder was created.
    pub created_date: DateTime<Utc>,
    /// Whether the folder is publicly visible.
    #[serde(default)]
    pub is_public: bool,
    /// Parent folder; `None` for root-level folders.
    #[serde(default, deserialize_with = "serde_helpers::optional_id")]
    pub parent_id: Option<FolderId>,
}

impl Folder {
    /// Decode a folder from a backend record.
    pub fn from_record(record: Record) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(record))
    }

    /// Check if this is a root-level folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Client-writable folder fields.
///
/// Only fields that are `Some` are forwarded; `parent_id: Some(None)`
/// writes an explicit null (move to root).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderInput {
    /// Folder name.
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tags.
    #[serde(rename = "Tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Owner reference.
    #[serde(rename = "Owner", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Cached file count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<u64>,
    /// Creation timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    /// Public visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    /// Parent folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<FolderId>>,
}

impl FolderInput {
    /// Start an input with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the parent folder (`None` = root).
    pub fn under(mut self, parent_id: Option<FolderId>) -> Self {
        self.parent_id = Some(parent_id);
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

impl From<&Folder> for FolderInput {
    /// Copy every client-writable field of an existing folder.
    fn from(folder: &Folder) -> Self {
        Self {
            name: Some(folder.name.clone()),
            tags: Some(folder.tags.clone()),
            owner: folder.owner.clone(),
            file_count: Some(folder.file_count),
            created_date: Some(folder.created_date),
            is_public: Some(folder.is_public),
            parent_id: Some(folder.parent_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FOLDER_TABLE;
    use serde_json::json;

    #[test]
    fn test_from_record_root_folder() {
        let value = json!({
            "Id": "0b8f5c3e-7d8a-4b0e-9f43-6f0b2a7c9d11",
            "Name": "Docs",
            "created_date": "2024-01-15T08:00:00Z",
            "parent_id": null
        });
        let Value::Object(record) = value else {
            unreachable!()
        };
        let folder = Folder::from_record(record).expect("decode");
        assert!(folder.is_root());
        assert_eq!(folder.file_count, 0);
        assert!(!folder.is_public);
        assert!(folder.tags.is_empty());
    }

    #[test]
    fn test_missing_created_date_is_rejected() {
        let Value::Object(record) = json!({ "Id": FolderId::new().to_string(), "Name": "x" }) else {
            unreachable!()
        };
        assert!(Folder::from_record(record).is_err());
    }

    #[test]
    fn test_input_keys_are_updateable() {
        let input = FolderInput {
            name: Some("a".into()),
            tags: Some(vec![]),
            owner: Some("me".into()),
            file_count: Some(3),
            created_date: Some(Utc::now()),
            is_public: Some(true),
            parent_id: Some(Some(FolderId::new())),
        };
        let record = input.to_record().expect("encode");
        assert_eq!(record.len(), FOLDER_TABLE.updateable_fields.len());
        for key in record.keys() {
            assert!(FOLDER_TABLE.is_updateable(key));
        }
    }
}
