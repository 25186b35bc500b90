mod controller;
mod types;

pub use controller::VerificationController;
pub use types::{
    security_percentage, BatchVerification, IntegrityStatus, VerificationResult,
    VerificationSummary,
};
