use crate::context::Context;
use crate::library::LibraryController;
use crate::metrics::recorder::{self, UploadMetrics};
use crate::transport::{ProgressReporter, Transport};
use crate::upload::error::{UploadError, UploadResult};
use crate::upload::state_machine::UploadStateMachine;
use crate::upload::types::{UploadEvent, UploadFile, UploadId, UploadState, UploadSummary};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the file-selection input and the single upload slot.
pub struct UploadController<T> {
    ctx: Arc<Context<T>>,
    library: LibraryController<T>,
    machine: Arc<UploadStateMachine>,
    selection: Mutex<Option<UploadFile>>,
    next_id: AtomicU64,
}

impl<T: Transport> UploadController<T> {
    pub fn new(ctx: Arc<Context<T>>, library: LibraryController<T>) -> Self {
        Self {
            ctx,
            library,
            machine: Arc::new(UploadStateMachine::new()),
            selection: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn state(&self) -> UploadState {
        self.machine.current_state()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.machine.subscribe()
    }

    /// Put a file in the selection input without uploading it
    pub fn select(&self, file: UploadFile) {
        tracing::debug!(file = %file.name, bytes = file.size(), "file selected");
        *self.selection.lock() = Some(file);
    }

    pub fn selected_name(&self) -> Option<String> {
        self.selection.lock().as_ref().map(|f| f.name.clone())
    }

    pub fn clear_selection(&self) {
        *self.selection.lock() = None;
    }

    /// Upload whatever is in the selection input
    pub async fn upload_selected(&self) -> UploadResult<UploadSummary> {
        let file = self.selection.lock().clone();
        match file {
            Some(file) => self.begin_upload(file).await,
            None => {
                self.ctx.notifications.warning("Please select a file to upload");
                Err(UploadError::NoFileSelected)
            }
        }
    }

    /// Drag-and-drop: only the first dropped file is uploaded
    pub async fn drop_files(&self, files: Vec<UploadFile>) -> UploadResult<UploadSummary> {
        match files.into_iter().next() {
            Some(file) => self.begin_upload(file).await,
            None => {
                self.ctx.notifications.warning("Please select a file to upload");
                Err(UploadError::NoFileSelected)
            }
        }
    }

    /// Upload a file from disk. The size limit is checked against the file's
    /// metadata, so an oversized file is never read.
    pub async fn begin_upload_path(&self, path: &Path) -> UploadResult<UploadSummary> {
        let size = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                let err = UploadError::Io(format!("{}: {e}", path.display()));
                self.ctx.notifications.error(err.to_string());
                return Err(err);
            }
        };
        self.check_size(&path.display().to_string(), size)?;

        let file = match UploadFile::from_path(path).await {
            Ok(file) => file,
            Err(e) => {
                self.ctx.notifications.error(e.to_string());
                return Err(e);
            }
        };
        self.begin_upload(file).await
    }

    /// Validate and transfer one file, then reload files and stats.
    ///
    /// Oversized files and uploads attempted while another is transferring are
    /// refused before any network call.
    pub async fn begin_upload(&self, file: UploadFile) -> UploadResult<UploadSummary> {
        self.check_size(&file.name, file.size())?;

        let upload_id = UploadId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Err(e) = self.machine.transition(UploadEvent::Start {
            upload_id,
            file_name: file.name.clone(),
        }) {
            tracing::warn!(file = %file.name, error = %e, "upload rejected");
            recorder::record_upload_rejected("busy");
            self.ctx.notifications.warning(e.to_string());
            return Err(e);
        }

        let _loading = self.ctx.loading.begin();
        let metrics = UploadMetrics::start(file.size());
        tracing::info!(file = %file.name, bytes = file.size(), "upload started");

        let (reporter, mut progress) = ProgressReporter::channel();
        let transfer = self.ctx.api.upload(file.into_payload(), reporter.clone());
        tokio::pin!(transfer);

        let result = loop {
            tokio::select! {
                biased;
                result = &mut transfer => break result,
                changed = progress.changed() => {
                    if changed.is_ok() {
                        let percent = *progress.borrow_and_update();
                        let _ = self.machine.transition(UploadEvent::Progress { percent });
                    }
                }
            }
        };

        match result {
            Ok(summary) => {
                let _ = self.machine.transition(UploadEvent::Progress {
                    percent: reporter.current(),
                });
                self.machine.transition(UploadEvent::Succeed {
                    summary: summary.clone(),
                })?;
                metrics.complete();
                tracing::info!(file = %summary.filename, hash = %summary.hash, "upload complete");

                self.schedule_acknowledge(upload_id);
                self.clear_selection();

                let _ = self.library.refresh_files().await;
                let _ = self.library.load_stats().await;
                Ok(summary)
            }
            Err(e) => {
                metrics.fail();
                tracing::warn!(error = %e, "upload failed");
                self.machine.transition(UploadEvent::Fail {
                    reason: e.to_string(),
                })?;
                self.ctx.notifications.error(format!("Upload failed: {e}"));
                self.machine
                    .transition(UploadEvent::Acknowledge { upload_id })?;
                Err(e.into())
            }
        }
    }

    fn check_size(&self, name: &str, size: u64) -> UploadResult<()> {
        let limit = self.ctx.config.max_upload_bytes;
        if size <= limit {
            return Ok(());
        }

        let err = UploadError::FileTooLarge { size, limit };
        tracing::warn!(file = %name, bytes = size, limit, "upload rejected");
        recorder::record_upload_rejected("too_large");
        self.ctx.notifications.error(err.to_string());
        Err(err)
    }

    // Hide the success banner after its display time unless a newer upload replaced it
    fn schedule_acknowledge(&self, upload_id: UploadId) {
        let machine = self.machine.clone();
        let deadline = tokio::time::Instant::now() + self.ctx.config.upload_banner_ttl;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = machine.transition(UploadEvent::Acknowledge { upload_id });
        });
    }
}
