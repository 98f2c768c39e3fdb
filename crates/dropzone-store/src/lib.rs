//! # dropzone-store
//!
//! Record store implementations for DropZone. The in-memory store mirrors
//! the filter, ordering, and response semantics of the hosted record
//! backend so it can stand in for it in the binary and in tests.

pub mod memory;

pub use memory::{MemoryRecordClient, StoreCall, StoreOp};
