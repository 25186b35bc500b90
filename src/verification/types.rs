use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of checking one file against its recorded fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub filename: String,
    pub is_intact: bool,
    #[serde(deserialize_with = "deserialize_score")]
    pub trust_score: u8,
    /// `Some(false)` when the service could not check the file at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityStatus {
    Intact,
    Tampered,
    Unverified,
}

impl IntegrityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrityStatus::Intact => "intact",
            IntegrityStatus::Tampered => "tampered",
            IntegrityStatus::Unverified => "unverified",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            IntegrityStatus::Intact => "check-circle",
            IntegrityStatus::Tampered => "exclamation-triangle",
            IntegrityStatus::Unverified => "question-circle",
        }
    }
}

impl VerificationResult {
    pub fn status(&self) -> IntegrityStatus {
        if self.verified == Some(false) {
            IntegrityStatus::Unverified
        } else if self.is_intact {
            IntegrityStatus::Intact
        } else {
            IntegrityStatus::Tampered
        }
    }
}

/// Batch verification as sent by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchVerification {
    pub verified_count: u64,
    pub tampered_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_files: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_percentage: Option<f64>,
    #[serde(default)]
    pub results: Vec<VerificationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_time: Option<String>,
}

/// The displayed result of the last batch run; replaced in full by the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationSummary {
    pub verified_count: u64,
    pub tampered_count: u64,
    pub security_percentage: u8,
    /// What the service itself claimed, kept for diagnostics
    pub reported_percentage: Option<f64>,
    /// In the order the service returned them
    pub results: Vec<VerificationResult>,
    pub completed_at: DateTime<Utc>,
}

impl VerificationSummary {
    /// Same counts and same per-file results in the same order
    pub fn same_outcome(&self, other: &VerificationSummary) -> bool {
        self.verified_count == other.verified_count
            && self.tampered_count == other.tampered_count
            && self.security_percentage == other.security_percentage
            && self.results == other.results
    }

    pub fn unverified_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status() == IntegrityStatus::Unverified)
            .count()
    }
}

impl From<BatchVerification> for VerificationSummary {
    fn from(batch: BatchVerification) -> Self {
        let security_percentage = security_percentage(batch.verified_count, batch.tampered_count);
        if let Some(reported) = batch.security_percentage {
            if (reported - f64::from(security_percentage)).abs() >= 1.0 {
                tracing::debug!(
                    reported,
                    computed = security_percentage,
                    "service reported a different security percentage"
                );
            }
        }

        Self {
            verified_count: batch.verified_count,
            tampered_count: batch.tampered_count,
            security_percentage,
            reported_percentage: batch.security_percentage,
            results: batch.results,
            completed_at: Utc::now(),
        }
    }
}

/// `round(100 * verified / (verified + tampered))`, or 100 when nothing was checked.
pub fn security_percentage(verified: u64, tampered: u64) -> u8 {
    let total = u128::from(verified) + u128::from(tampered);
    if total == 0 {
        return 100;
    }
    ((verified as f64 * 100.0) / total as f64).round() as u8
}

// Scores arrive as JSON numbers, possibly fractional; clamp into 0..=100
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("trust score is not a number"));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}
