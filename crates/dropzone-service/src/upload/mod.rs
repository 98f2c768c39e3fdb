//! Simulated upload pipeline: timer-driven progress, stored on completion.

pub mod draft;
pub mod progress;
pub mod state;
pub mod tracker;

pub use draft::FileDraft;
pub use progress::{FixedProgress, ProgressSource, RandomProgress};
pub use state::{UploadEntry, UploadPhase};
pub use tracker::UploadTracker;
