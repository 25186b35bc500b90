mod controller;
mod error;
mod state_machine;
mod types;

pub use controller::UploadController;
pub use error::{UploadError, UploadResult};
pub use state_machine::UploadStateMachine;
pub use types::{UploadEvent, UploadFile, UploadId, UploadState, UploadSummary};
