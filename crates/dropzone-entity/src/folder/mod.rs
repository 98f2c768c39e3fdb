//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{Folder, FolderInput};
pub use tree::{Breadcrumb, FolderPath};
