//! Convenience result type alias for DropZone.

use crate::error::AppError;

/// A specialized `Result` type for DropZone operations.
pub type AppResult<T> = Result<T, AppError>;
