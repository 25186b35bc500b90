use crate::config::DashboardConfig;
use crate::notify::NotificationQueue;
use crate::store::DomainStore;
use crate::transport::{ApiClient, Transport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts operations in flight; the indicator is visible while the count is non-zero.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    pending: Arc<AtomicUsize>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the indicator until the returned guard is dropped
    pub fn begin(&self) -> LoadingGuard {
        self.pending.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            pending: self.pending.clone(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

#[must_use = "the loading indicator hides as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    pending: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Collaborators shared by every controller.
pub struct Context<T> {
    pub api: ApiClient<T>,
    pub store: Arc<DomainStore>,
    pub notifications: NotificationQueue,
    pub loading: LoadingIndicator,
    pub config: DashboardConfig,
}

impl<T: Transport> Context<T> {
    pub fn new(transport: Arc<T>, config: DashboardConfig) -> Self {
        Self {
            api: ApiClient::new(transport),
            store: Arc::new(DomainStore::new()),
            notifications: NotificationQueue::new(config.notification_ttl),
            loading: LoadingIndicator::new(),
            config,
        }
    }

    /// Share an existing store instead of creating a fresh one
    pub fn with_store(mut self, store: Arc<DomainStore>) -> Self {
        self.store = store;
        self
    }
}
