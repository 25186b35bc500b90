use crate::transport::FilePayload;
use crate::upload::error::{UploadError, UploadResult};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, naming it after the last path component
    pub async fn from_path(path: &Path) -> UploadResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| UploadError::Io(format!("{} has no file name", path.display())))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::Io(format!("{}: {e}", path.display())))?;

        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn into_payload(self) -> FilePayload {
        FilePayload::new(self.name, self.bytes)
    }
}

/// What the service reports back for a stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub filename: String,
    pub size: u64,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Transferring {
        upload_id: UploadId,
        file_name: String,
        progress: u8,
    },
    Succeeded {
        upload_id: UploadId,
        summary: UploadSummary,
    },
    Failed {
        upload_id: UploadId,
        reason: String,
    },
}

impl UploadState {
    pub fn is_transferring(&self) -> bool {
        matches!(self, UploadState::Transferring { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadState::Succeeded { .. } | UploadState::Failed { .. }
        )
    }

    pub fn progress(&self) -> Option<u8> {
        match self {
            UploadState::Transferring { progress, .. } => Some(*progress),
            _ => None,
        }
    }

    pub fn upload_id(&self) -> Option<UploadId> {
        match self {
            UploadState::Idle => None,
            UploadState::Transferring { upload_id, .. }
            | UploadState::Succeeded { upload_id, .. }
            | UploadState::Failed { upload_id, .. } => Some(*upload_id),
        }
    }
}

#[derive(Debug, Clone)]
pub enum UploadEvent {
    Start {
        upload_id: UploadId,
        file_name: String,
    },
    Progress {
        percent: u8,
    },
    Succeed {
        summary: UploadSummary,
    },
    Fail {
        reason: String,
    },
    /// The terminal state of `upload_id` has been shown; return to idle
    Acknowledge {
        upload_id: UploadId,
    },
}
