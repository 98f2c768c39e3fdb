//! File management.

pub mod service;

pub use service::FileService;
