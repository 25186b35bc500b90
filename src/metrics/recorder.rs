//! Metrics recorder for dashboard operations
//!
//! Records request outcomes, upload lifecycle and verification results.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    describe_counter!(
        "dashboard_requests_total",
        "Requests sent to the verification service"
    );
    describe_histogram!(
        "dashboard_request_duration_seconds",
        "Round-trip time of service requests"
    );

    describe_counter!("dashboard_uploads_total", "Uploads by outcome");
    describe_histogram!("dashboard_upload_bytes", "Size of uploaded files");
    describe_histogram!(
        "dashboard_upload_duration_seconds",
        "Time from transfer start to terminal state"
    );
    describe_gauge!(
        "dashboard_active_uploads",
        "Uploads currently transferring (0 or 1)"
    );

    describe_counter!(
        "dashboard_verifications_total",
        "Per-file verification results by outcome"
    );
    describe_counter!(
        "dashboard_notifications_total",
        "Notifications shown by severity"
    );
}

// ============== Transport ==============

/// Record one request round-trip
pub fn record_request(method: &str, success: bool, duration: Duration) {
    let outcome = if success { "ok" } else { "error" };
    counter!("dashboard_requests_total", "method" => method.to_string(), "outcome" => outcome)
        .increment(1);
    histogram!("dashboard_request_duration_seconds", "method" => method.to_string())
        .record(duration.as_secs_f64());
}

// ============== Uploads ==============

/// Record an upload refused before any transfer
pub fn record_upload_rejected(reason: &'static str) {
    counter!("dashboard_uploads_total", "outcome" => "rejected", "reason" => reason).increment(1);
}

// ============== Verification ==============

pub fn record_verification(is_intact: bool) {
    let outcome = if is_intact { "intact" } else { "tampered" };
    counter!("dashboard_verifications_total", "outcome" => outcome).increment(1);
}

pub fn record_batch_verification(verified: u64, tampered: u64) {
    counter!("dashboard_verifications_total", "outcome" => "intact").increment(verified);
    counter!("dashboard_verifications_total", "outcome" => "tampered").increment(tampered);
}

// ============== Notifications ==============

pub fn record_notification(severity: &str) {
    counter!("dashboard_notifications_total", "severity" => severity.to_string()).increment(1);
}

/// Tracks one upload from transfer start to terminal state
pub struct UploadMetrics {
    start_time: Instant,
    bytes: u64,
}

impl UploadMetrics {
    /// Start tracking a new upload
    pub fn start(bytes: u64) -> Self {
        gauge!("dashboard_active_uploads").increment(1.0);
        histogram!("dashboard_upload_bytes").record(bytes as f64);

        Self {
            start_time: Instant::now(),
            bytes,
        }
    }

    /// Mark upload as complete
    pub fn complete(self) {
        counter!("dashboard_uploads_total", "outcome" => "succeeded").increment(1);
        self.finish();
    }

    /// Mark upload as failed
    pub fn fail(self) {
        counter!("dashboard_uploads_total", "outcome" => "failed").increment(1);
        self.finish();
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn finish(self) {
        gauge!("dashboard_active_uploads").decrement(1.0);
        histogram!("dashboard_upload_duration_seconds").record(self.elapsed().as_secs_f64());
    }
}
