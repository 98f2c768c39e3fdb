//! Core traits defined in `dropzone-core` and implemented by other crates.

pub mod clock;
pub mod notifier;
pub mod record_client;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notifier::{
    Notification, NotificationLevel, NotificationQueue, Notifier, TracingNotifier,
};
pub use record_client::RecordClient;
