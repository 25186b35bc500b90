mod queue;
mod types;

pub use queue::NotificationQueue;
pub use types::{Notification, NotificationId, Severity};
