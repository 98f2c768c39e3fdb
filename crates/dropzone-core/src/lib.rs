//! # dropzone-core
//!
//! Core crate for DropZone. Contains the record-store seam, the clock and
//! notifier seams, configuration schemas, typed identifiers, record query
//! types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DropZone crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
