//! Server-managed audit fields shared by every table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit columns maintained by the record store.
///
/// These are read-only for clients: no input struct carries them, so they
/// can never be forwarded on create or update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditInfo {
    /// When the record was created.
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<DateTime<Utc>>,
    /// Who created the record.
    #[serde(rename = "CreatedBy", default)]
    pub created_by: Option<String>,
    /// When the record was last modified.
    #[serde(rename = "ModifiedOn", default)]
    pub modified_on: Option<DateTime<Utc>>,
    /// Who last modified the record.
    #[serde(rename = "ModifiedBy", default)]
    pub modified_by: Option<String>,
}
