use crate::search::SearchError;
use crate::transport::TransportError;
use crate::upload::UploadError;
use thiserror::Error;

/// Why a dispatched action did not complete; the user has already been notified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl DashboardError {
    /// Rejected on the client without a network call
    pub fn is_validation(&self) -> bool {
        match self {
            DashboardError::Upload(e) => e.is_validation(),
            DashboardError::Search(e) => e.is_validation(),
            DashboardError::Transport(_) => false,
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
