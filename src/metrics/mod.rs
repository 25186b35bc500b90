//! Metrics and observability module
//!
//! Provides Prometheus-compatible metrics for the dashboard controllers.
//!
//! Key metrics exposed:
//! - Service requests by method and outcome, with round-trip latency
//! - Upload outcomes, sizes and durations
//! - Verification results (intact vs tampered)
//! - Notifications by severity

pub mod exporter;
pub mod recorder;

pub use exporter::{start_metrics_server, MetricsBuilder, MetricsConfig, MetricsError};
pub use recorder::{init_metrics, UploadMetrics};
