//! Core type definitions used across the DropZone workspace.

pub mod filter;
pub mod id;
pub mod record;
pub mod sorting;

pub use filter::{FilterOperator, WhereCondition};
pub use id::*;
pub use record::{
    DeleteResponse, FetchQuery, FetchResponse, ID_FIELD, MutationResponse, Record, RecordResponse,
    RecordResult,
};
pub use sorting::{OrderBy, SortBy, SortDirection, ViewMode};
