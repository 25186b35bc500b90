mod action;
mod dashboard;
mod error;

pub use action::{Action, ActionOutcome};
pub use dashboard::Dashboard;
pub use error::{DashboardError, DashboardResult};
