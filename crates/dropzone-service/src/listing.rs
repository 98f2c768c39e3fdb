//! Presentation-side filtering and ordering of the file collection.

use std::cmp::Ordering;

use dropzone_core::types::{FolderId, SortBy};
use dropzone_entity::file::File;
use dropzone_entity::folder::Folder;

/// Files directly inside `folder` whose name contains `search`
/// (case-insensitive), ordered by `sort`.
///
/// Name order is ascending; size and date order are descending. The sort
/// is stable, so equal keys keep collection order.
pub fn filter_and_sort(
    files: &[File],
    folder: Option<FolderId>,
    search: &str,
    sort: SortBy,
) -> Vec<File> {
    let needle = search.trim().to_lowercase();
    let mut visible: Vec<File> = files
        .iter()
        .filter(|f| f.is_in(folder))
        .filter(|f| needle.is_empty() || f.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    visible.sort_by(|a, b| compare_files(a, b, sort));
    visible
}

/// Ordering used by [`filter_and_sort`].
pub fn compare_files(a: &File, b: &File, sort: SortBy) -> Ordering {
    match sort {
        SortBy::Name => compare_names(&a.name, &b.name),
        SortBy::Size => b.size.cmp(&a.size),
        SortBy::Date => b.upload_date.cmp(&a.upload_date),
    }
}

/// Folders directly inside `parent`, by name.
pub fn child_folders(folders: &[Folder], parent: Option<FolderId>) -> Vec<Folder> {
    let mut children: Vec<Folder> = folders
        .iter()
        .filter(|f| f.parent_id == parent)
        .cloned()
        .collect();
    children.sort_by(|a, b| compare_names(&a.name, &b.name));
    children
}

/// Case-insensitive name order with an exact tie-break.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
