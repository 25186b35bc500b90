//! Client-side controller for a file-integrity dashboard.
//!
//! The remote verification service stores files, fingerprints them and scores their
//! integrity. This crate drives it: uploads with progress, single and batch
//! verification, search, deletion and section navigation, keeping a session store that
//! always reflects the latest completed fetch. Rendering is left to the caller through
//! the projections in [`view`].

pub mod config;
pub mod context;
pub mod dashboard;
pub mod library;
pub mod metrics;
pub mod navigator;
pub mod notify;
pub mod search;
pub mod store;
pub mod transport;
pub mod upload;
pub mod verification;
pub mod view;

pub use config::DashboardConfig;
pub use dashboard::{Action, ActionOutcome, Dashboard, DashboardError, DashboardResult};
