//! Record-store table schemas.

/// Static description of a record-store table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name on the backend.
    pub name: &'static str,
    /// Every readable field.
    pub all_fields: &'static [&'static str],
    /// Fields a client may set on create or update.
    pub updateable_fields: &'static [&'static str],
}

impl TableSchema {
    /// Readable fields as owned strings, for query projections.
    pub fn field_list(&self) -> Vec<String> {
        self.all_fields.iter().map(|f| f.to_string()).collect()
    }

    /// Whether a client may write the named field.
    pub fn is_updateable(&self, field: &str) -> bool {
        self.updateable_fields.contains(&field)
    }
}

/// The `file1` table.
pub const FILE_TABLE: TableSchema = TableSchema {
    name: "file1",
    all_fields: &[
        "Name",
        "Tags",
        "Owner",
        "CreatedOn",
        "CreatedBy",
        "ModifiedOn",
        "ModifiedBy",
        "size",
        "type",
        "upload_date",
        "last_modified",
        "url",
        "thumbnail_url",
        "is_public",
        "folder_id",
    ],
    updateable_fields: &[
        "Name",
        "Tags",
        "Owner",
        "size",
        "type",
        "upload_date",
        "last_modified",
        "url",
        "thumbnail_url",
        "is_public",
        "folder_id",
    ],
};

/// The `folder1` table.
pub const FOLDER_TABLE: TableSchema = TableSchema {
    name: "folder1",
    all_fields: &[
        "Name",
        "Tags",
        "Owner",
        "CreatedOn",
        "CreatedBy",
        "ModifiedOn",
        "ModifiedBy",
        "file_count",
        "created_date",
        "is_public",
        "parent_id",
    ],
    updateable_fields: &[
        "Name",
        "Tags",
        "Owner",
        "file_count",
        "created_date",
        "is_public",
        "parent_id",
    ],
};

/// Field holding a file's owning folder.
pub const FILE_FOLDER_FIELD: &str = "folder_id";

/// Field holding a folder's parent.
pub const FOLDER_PARENT_FIELD: &str = "parent_id";

/// Display-name field on every table.
pub const NAME_FIELD: &str = "Name";
