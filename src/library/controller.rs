use crate::context::Context;
use crate::store::{FileRecord, Stats};
use crate::transport::{Transport, TransportResult};
use std::sync::Arc;
use tokio::time::Instant;

/// Loads the file list and stats into the store and deletes files.
///
/// Failures become one error notification each; the store keeps its previous
/// contents.
pub struct LibraryController<T> {
    ctx: Arc<Context<T>>,
}

impl<T> Clone for LibraryController<T> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
        }
    }
}

impl<T: Transport> LibraryController<T> {
    pub fn new(ctx: Arc<Context<T>>) -> Self {
        Self { ctx }
    }

    /// First load of the page: stats and files fetched concurrently
    pub async fn initialize(&self) -> (TransportResult<Stats>, TransportResult<Vec<FileRecord>>) {
        let _loading = self.ctx.loading.begin();
        tokio::join!(self.load_stats(), self.refresh_files())
    }

    /// Refetch the file list and replace the store's copy
    pub async fn refresh_files(&self) -> TransportResult<Vec<FileRecord>> {
        match self.ctx.api.list_files().await {
            Ok(files) => {
                self.ctx.store.replace_files(files.clone(), Instant::now());
                Ok(files)
            }
            Err(e) => {
                self.ctx
                    .notifications
                    .error(format!("Failed to load files: {e}"));
                Err(e)
            }
        }
    }

    pub async fn load_stats(&self) -> TransportResult<Stats> {
        match self.ctx.api.stats().await {
            Ok(stats) => {
                self.ctx.store.replace_stats(stats.clone(), Instant::now());
                Ok(stats)
            }
            Err(e) => {
                self.ctx
                    .notifications
                    .error(format!("Failed to load statistics: {e}"));
                Err(e)
            }
        }
    }

    /// Delete a file on the service, then reload files and stats in that order
    pub async fn delete_file(&self, filename: &str) -> TransportResult<()> {
        let _loading = self.ctx.loading.begin();

        if let Err(e) = self.ctx.api.delete(filename).await {
            tracing::warn!(file = %filename, error = %e, "delete failed");
            self.ctx.notifications.error(format!("Delete failed: {e}"));
            return Err(e);
        }

        tracing::info!(file = %filename, "file deleted");
        self.ctx
            .notifications
            .success(format!("{filename} deleted successfully"));

        // Reload failures are already reported; the delete itself succeeded
        let _ = self.refresh_files().await;
        let _ = self.load_stats().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::notify::Severity;
    use crate::transport::fake::FakeTransport;
    use crate::transport::{Method, TransportError};
    use serde_json::json;

    fn setup() -> (Arc<FakeTransport>, Arc<Context<FakeTransport>>, LibraryController<FakeTransport>) {
        let fake = Arc::new(FakeTransport::new());
        let ctx = Arc::new(Context::new(fake.clone(), DashboardConfig::default()));
        let library = LibraryController::new(ctx.clone());
        (fake, ctx, library)
    }

    fn files_json(names: &[&str]) -> serde_json::Value {
        let files: Vec<_> = names
            .iter()
            .map(|n| {
                json!({
                    "file_name": n,
                    "file_size": 10,
                    "hash": "ab".repeat(32),
                    "upload_date": "2026-10-18T10:00:00Z"
                })
            })
            .collect();
        json!({ "success": true, "files": files, "count": names.len() })
    }

    #[tokio::test]
    async fn test_initialize_loads_both() {
        let (fake, ctx, library) = setup();
        fake.respond(Method::Get, "/api/files", Ok(files_json(&["a.txt", "b.txt"])));
        fake.respond(
            Method::Get,
            "/api/stats",
            Ok(json!({"data": {"active_files": 2, "deleted_files": 1, "total_storage_bytes": 20}})),
        );

        let (stats, files) = library.initialize().await;
        assert_eq!(stats.unwrap().deleted_files, 1);
        assert_eq!(files.unwrap().len(), 2);
        assert_eq!(ctx.store.file_count(), 2);
        assert!(!ctx.loading.is_visible());
        assert!(ctx.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_store() {
        let (fake, ctx, library) = setup();
        fake.respond(Method::Get, "/api/files", Ok(files_json(&["a.txt"])));
        fake.respond(
            Method::Get,
            "/api/files",
            Err(TransportError::Status {
                status: 500,
                message: "database offline".into(),
            }),
        );

        library.refresh_files().await.unwrap();
        assert!(library.refresh_files().await.is_err());

        assert_eq!(ctx.store.file_count(), 1);
        let notes = ctx.notifications.active();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Error);
        assert_eq!(notes[0].message, "Failed to load files: database offline");
    }

    #[tokio::test]
    async fn test_delete_refreshes_in_order() {
        let (fake, ctx, library) = setup();
        fake.respond(Method::Delete, "/api/delete/a.txt", Ok(json!({"success": true})));
        fake.respond(Method::Get, "/api/files", Ok(files_json(&[])));
        fake.respond(Method::Get, "/api/stats", Ok(json!({"data": {}})));

        library.delete_file("a.txt").await.unwrap();

        assert_eq!(
            fake.paths(),
            vec!["DELETE /api/delete/a.txt", "GET /api/files", "GET /api/stats"]
        );
        assert_eq!(ctx.notifications.active()[0].message, "a.txt deleted successfully");
        assert!(!ctx.loading.is_visible());
    }

    #[tokio::test]
    async fn test_delete_failure_notifies_once() {
        let (fake, ctx, library) = setup();
        fake.respond(
            Method::Delete,
            "/api/delete/missing.txt",
            Err(TransportError::Status {
                status: 404,
                message: "File not found".into(),
            }),
        );

        assert!(library.delete_file("missing.txt").await.is_err());
        assert_eq!(fake.request_count(), 1);

        let notes = ctx.notifications.active();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "Delete failed: File not found");
        assert!(!ctx.loading.is_visible());
    }
}
