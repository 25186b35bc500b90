use crate::metrics::recorder;
use crate::notify::types::{Notification, NotificationId, Severity};
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;

struct QueueInner {
    active: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
    default_ttl: Duration,
    events: broadcast::Sender<Notification>,
}

/// Transient user-facing messages in arrival order.
///
/// Every notification owns its own expiry timer; removing one never touches another.
/// Identical messages are not merged.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<QueueInner>,
}

impl NotificationQueue {
    pub fn new(default_ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(QueueInner {
                active: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                default_ttl,
                events,
            }),
        }
    }

    pub fn push(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        self.push_with_ttl(message, severity, self.inner.default_ttl)
    }

    pub fn push_with_ttl(
        &self,
        message: impl Into<String>,
        severity: Severity,
        ttl: Duration,
    ) -> NotificationId {
        let id = NotificationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
            duration: ttl,
        };

        match severity {
            Severity::Error | Severity::Warning => {
                tracing::warn!(severity = %severity, message = %notification.message, "notification")
            }
            _ => tracing::info!(severity = %severity, message = %notification.message, "notification"),
        }
        recorder::record_notification(severity.as_str());

        self.inner.active.lock().push(notification.clone());
        let _ = self.inner.events.send(notification);

        self.schedule_expiry(id, ttl);
        id
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.push(message, Severity::Info)
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.push(message, Severity::Success)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.push(message, Severity::Warning)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.push(message, Severity::Error)
    }

    /// Remove a notification before its timer fires
    pub fn dismiss(&self, id: NotificationId) -> bool {
        remove(&self.inner, id)
    }

    /// Visible notifications, oldest first
    pub fn active(&self) -> Vec<Notification> {
        self.inner.active.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.active.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stream of notifications as they are pushed
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.inner.events.subscribe()
    }

    fn schedule_expiry(&self, id: NotificationId, ttl: Duration) {
        let weak: Weak<QueueInner> = Arc::downgrade(&self.inner);
        let deadline = tokio::time::Instant::now() + ttl;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    if let Some(inner) = weak.upgrade() {
                        remove(&inner, id);
                    }
                });
            }
            Err(_) => tracing::debug!(id = id.0, "no runtime, notification will not expire"),
        }
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}

fn remove(inner: &QueueInner, id: NotificationId) -> bool {
    let mut active = inner.active.lock();
    let before = active.len();
    active.retain(|n| n.id != id);
    before != active.len()
}
