use crate::navigator::NavigationOutcome;
use crate::search::SearchResults;
use crate::upload::{UploadFile, UploadSummary};
use crate::verification::{VerificationResult, VerificationSummary};
use std::path::PathBuf;

/// Every user interaction the dashboard reacts to.
#[derive(Debug, Clone)]
pub enum Action {
    /// Section id, with or without a leading `#`
    Navigate(String),
    SelectFile(UploadFile),
    DropFiles(Vec<UploadFile>),
    UploadSelected,
    Upload(UploadFile),
    /// Upload straight from disk; the size limit is checked before reading
    UploadPath(PathBuf),
    VerifyFile(String),
    VerifyAll,
    Delete(String),
    Search(String),
    /// Reload files and stats
    Refresh,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Navigate(_) => "navigate",
            Action::SelectFile(_) => "select_file",
            Action::DropFiles(_) => "drop_files",
            Action::UploadSelected => "upload_selected",
            Action::Upload(_) => "upload",
            Action::UploadPath(_) => "upload_path",
            Action::VerifyFile(_) => "verify_file",
            Action::VerifyAll => "verify_all",
            Action::Delete(_) => "delete",
            Action::Search(_) => "search",
            Action::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Navigated(NavigationOutcome),
    Selected(String),
    Uploaded(UploadSummary),
    Verified(VerificationResult),
    VerifiedAll(VerificationSummary),
    Deleted(String),
    Searched(SearchResults),
    Refreshed,
}
