use crate::transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("File size exceeds {}MB limit", .limit / (1024 * 1024))]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Another upload is already in progress")]
    Busy,

    #[error("No file selected")]
    NoFileSelected,

    #[error("Cannot read file: {0}")]
    Io(String),

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl UploadError {
    /// Rejected before any network call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UploadError::FileTooLarge { .. } | UploadError::Busy | UploadError::NoFileSelected
        )
    }
}

pub type UploadResult<T> = Result<T, UploadError>;
