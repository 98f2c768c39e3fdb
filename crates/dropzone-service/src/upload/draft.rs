//! Files waiting to be uploaded.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use dropzone_core::error::{AppError, ErrorKind};
use dropzone_core::result::AppResult;
use dropzone_core::types::FolderId;
use dropzone_entity::file::FileInput;

/// Metadata of a file picked for upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDraft {
    /// File name, including extension.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type.
    pub mime_type: String,
    /// Modification time of the source, if known.
    pub last_modified: Option<DateTime<Utc>>,
    /// Content locator.
    pub url: Option<String>,
    /// Thumbnail locator, for images.
    pub thumbnail_url: Option<String>,
    /// Destination folder (`None` = root).
    pub folder_id: Option<FolderId>,
    /// Tags.
    pub tags: Vec<String>,
}

impl FileDraft {
    /// A draft with just a name, size, and type.
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            last_modified: None,
            url: None,
            thumbnail_url: None,
            folder_id: None,
            tags: Vec::new(),
        }
    }

    /// Describe a local file. The type is guessed from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::validation(format!("{} has no file name", path.display())))?;

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Validation,
                format!("Cannot read {}: {e}", path.display()),
                e,
            )
        })?;
        if !metadata.is_file() {
            return Err(AppError::validation(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let absolute = tokio::fs::canonicalize(path).await?;
        let url = format!("file://{}", absolute.display());
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let thumbnail_url = mime_type.starts_with("image/").then(|| url.clone());

        Ok(Self {
            name,
            size: metadata.len(),
            mime_type,
            last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            url: Some(url),
            thumbnail_url,
            folder_id: None,
            tags: Vec::new(),
        })
    }

    /// Set the destination folder.
    pub fn in_folder(mut self, folder_id: Option<FolderId>) -> Self {
        self.folder_id = folder_id;
        self
    }

    /// Set the content locator; images also get it as their thumbnail.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if self.mime_type.starts_with("image/") {
            self.thumbnail_url = Some(url.clone());
        }
        self.url = Some(url);
        self
    }

    /// The create request stored when the upload completes.
    pub fn to_input(&self) -> FileInput {
        FileInput {
            name: Some(self.name.clone()),
            tags: Some(self.tags.clone()),
            size: Some(self.size),
            mime_type: Some(self.mime_type.clone()),
            last_modified: self.last_modified,
            url: self.url.clone(),
            thumbnail_url: self.thumbnail_url.clone().map(Some),
            is_public: Some(false),
            folder_id: Some(self.folder_id),
            ..FileInput::default()
        }
    }
}
