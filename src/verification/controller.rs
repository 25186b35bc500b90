use crate::context::Context;
use crate::library::LibraryController;
use crate::metrics::recorder;
use crate::navigator::Section;
use crate::transport::{Transport, TransportResult};
use crate::verification::types::{VerificationResult, VerificationSummary};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Runs single and batch verification and holds the last displayed outcome.
pub struct VerificationController<T> {
    ctx: Arc<Context<T>>,
    library: LibraryController<T>,
    summary: RwLock<Option<VerificationSummary>>,
    last_result: RwLock<Option<VerificationResult>>,
    summary_visible: AtomicBool,
}

impl<T: Transport> VerificationController<T> {
    pub fn new(ctx: Arc<Context<T>>, library: LibraryController<T>) -> Self {
        Self {
            ctx,
            library,
            summary: RwLock::new(None),
            last_result: RwLock::new(None),
            summary_visible: AtomicBool::new(false),
        }
    }

    /// Last batch outcome, if any batch has completed
    pub fn summary(&self) -> Option<VerificationSummary> {
        self.summary.read().clone()
    }

    pub fn last_result(&self) -> Option<VerificationResult> {
        self.last_result.read().clone()
    }

    pub fn is_summary_visible(&self) -> bool {
        self.summary_visible.load(Ordering::SeqCst)
    }

    /// Show the summary panel if there is anything to show
    pub fn reveal_summary(&self) -> bool {
        let has_summary = self.summary.read().is_some();
        if has_summary {
            self.summary_visible.store(true, Ordering::SeqCst);
        }
        has_summary
    }

    /// Verify one file.
    ///
    /// A tampered file is a successful result, reported with an alert.
    pub async fn verify_single(&self, filename: &str) -> TransportResult<VerificationResult> {
        let _loading = self.ctx.loading.begin();

        let result = match self.ctx.api.verify(filename).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(file = %filename, error = %e, "verification failed");
                self.ctx
                    .notifications
                    .error(format!("Verification failed: {e}"));
                return Err(e);
            }
        };

        recorder::record_verification(result.is_intact);
        if result.is_intact {
            tracing::info!(file = %result.filename, score = result.trust_score, "file intact");
            self.ctx.notifications.success(format!(
                "{} is intact (Trust Score: {}%)",
                result.filename, result.trust_score
            ));
        } else {
            tracing::warn!(file = %result.filename, score = result.trust_score, "tamper detected");
            self.ctx.notifications.error(format!(
                "{} has been tampered with! Security Alert!",
                result.filename
            ));
        }

        *self.last_result.write() = Some(result.clone());
        let _ = self.library.refresh_files().await;
        if self.ctx.store.current_section() == Section::Verify {
            self.reveal_summary();
        }
        Ok(result)
    }

    /// Verify every file in one batch call; the summary is replaced, never merged.
    pub async fn verify_all(&self) -> TransportResult<VerificationSummary> {
        let _loading = self.ctx.loading.begin();

        let batch = match self.ctx.api.verify_all().await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(error = %e, "batch verification failed");
                self.ctx
                    .notifications
                    .error(format!("Batch verification failed: {e}"));
                return Err(e);
            }
        };

        let summary = VerificationSummary::from(batch);
        recorder::record_batch_verification(summary.verified_count, summary.tampered_count);
        tracing::info!(
            verified = summary.verified_count,
            tampered = summary.tampered_count,
            percentage = summary.security_percentage,
            "batch verification complete"
        );

        *self.summary.write() = Some(summary.clone());
        self.summary_visible.store(true, Ordering::SeqCst);

        if summary.tampered_count > 0 {
            self.ctx.notifications.warning(format!(
                "Verification complete: {} tampered files found!",
                summary.tampered_count
            ));
        } else {
            self.ctx.notifications.success(format!(
                "All {} files verified successfully!",
                summary.verified_count
            ));
        }

        let _ = self.library.refresh_files().await;
        Ok(summary)
    }
}
