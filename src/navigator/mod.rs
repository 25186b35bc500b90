mod navigator;
mod types;

pub use navigator::{SectionNavigator, SectionState};
pub use types::{
    refreshes_for, NavigationError, NavigationOutcome, Refresh, Section, REFRESH_POLICY,
};
