//! In-memory record store.

pub mod client;
pub mod matcher;

pub use client::{MemoryRecordClient, StoreCall, StoreOp};
