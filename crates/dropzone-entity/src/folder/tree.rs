//! Breadcrumb paths for folder navigation.

use serde::{Deserialize, Serialize};

use dropzone_core::types::FolderId;

use super::model::Folder;

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder the crumb navigates to; `None` is the root ("Home").
    pub id: Option<FolderId>,
    /// Label to display.
    pub name: String,
}

/// The trail from root to the current folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPath {
    /// Crumbs, root first.
    pub crumbs: Vec<Breadcrumb>,
}

impl FolderPath {
    /// Label used for the root crumb.
    pub const HOME: &'static str = "Home";

    /// A path containing only the root.
    pub fn root() -> Self {
        Self {
            crumbs: vec![Breadcrumb {
                id: None,
                name: Self::HOME.to_string(),
            }],
        }
    }

    /// Build a path from an ancestor chain ordered root first.
    pub fn from_ancestors<'a>(chain: impl IntoIterator<Item = &'a Folder>) -> Self {
        let mut path = Self::root();
        path.crumbs.extend(chain.into_iter().map(|f| Breadcrumb {
            id: Some(f.id),
            name: f.name.clone(),
        }));
        path
    }

    /// The folder the path ends at (`None` = root).
    pub fn current(&self) -> Option<FolderId> {
        self.crumbs.last().and_then(|c| c.id)
    }

    /// The folder one level up, if not already at root.
    pub fn parent(&self) -> Option<Option<FolderId>> {
        if self.crumbs.len() < 2 {
            return None;
        }
        Some(self.crumbs[self.crumbs.len() - 2].id)
    }

    /// Number of folders below root.
    pub fn depth(&self) -> usize {
        self.crumbs.len().saturating_sub(1)
    }
}

impl std::fmt::Display for FolderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.crumbs.iter().map(|c| c.name.as_str()).collect();
        write!(f, "{}", names.join(" > "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn folder(name: &str, parent: Option<FolderId>) -> Folder {
        Folder {
            id: FolderId::new(),
            name: name.to_string(),
            tags: Vec::new(),
            owner: None,
            audit: Default::default(),
            file_count: 0,
            created_date: Utc::now(),
            is_public: false,
            parent_id: parent,
        }
    }

    #[test]
    fn test_root_path() {
        let path = FolderPath::root();
        assert_eq!(path.current(), None);
        assert_eq!(path.parent(), None);
        assert_eq!(path.to_string(), "Home");
    }

    #[test]
    fn test_nested_path() {
        let docs = folder("Docs", None);
        let reports = folder("Reports", Some(docs.id));
        let path = FolderPath::from_ancestors([&docs, &reports]);
        assert_eq!(path.depth(), 2);
        assert_eq!(path.current(), Some(reports.id));
        assert_eq!(path.parent(), Some(Some(docs.id)));
        assert_eq!(path.to_string(), "Home > Docs > Reports");
    }
}
