//! Record-store backend configuration.

use serde::{Deserialize, Serialize};

/// Identifiers of the record-store project.
///
/// Both values are optional; what happens when they are absent is up to
/// the record client in use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project identifier.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Public API key for the project.
    #[serde(default)]
    pub public_key: Option<String>,
}

impl BackendConfig {
    /// Whether both identifiers are present and non-blank.
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.project_id) && present(&self.public_key)
    }
}
