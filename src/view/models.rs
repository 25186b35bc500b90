use crate::navigator::SectionState;
use crate::notify::Notification;
use crate::search::SearchResults;
use crate::store::{FileRecord, Stats, StoreSnapshot};
use crate::upload::UploadState;
use crate::verification::{IntegrityStatus, VerificationResult, VerificationSummary};
use crate::view::format::{format_bytes, format_date, format_percentage, hash_prefix};
use serde::Serialize;

pub const EMPTY_FILES_MESSAGE: &str = "No files uploaded yet";
pub const UPLOAD_PROGRESS_TEXT: &str = "Uploading file...";

const TABLE_HASH_CHARS: usize = 16;
const BANNER_HASH_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub icon: &'static str,
}

/// One file line with its verify and delete actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow {
    pub file_name: String,
    pub size: String,
    pub hash: String,
    pub uploaded: String,
}

impl From<&FileRecord> for FileRow {
    fn from(file: &FileRecord) -> Self {
        Self {
            file_name: file.file_name.clone(),
            size: format_bytes(file.file_size),
            hash: hash_prefix(&file.hash, TABLE_HASH_CHARS),
            uploaded: format_date(&file.upload_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub cards: Vec<StatCard>,
    pub rows: Vec<FileRow>,
    /// Shown instead of rows when there are no files
    pub empty_message: Option<&'static str>,
    pub total_files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UploadView {
    Hidden,
    Progress {
        file_name: String,
        percent: u8,
        text: &'static str,
    },
    Success {
        filename: String,
        size: String,
        hash: String,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationRow {
    pub filename: String,
    pub status: IntegrityStatus,
    pub icon: &'static str,
    pub score: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&VerificationResult> for VerificationRow {
    fn from(result: &VerificationResult) -> Self {
        let status = result.status();
        Self {
            filename: result.filename.clone(),
            status,
            icon: status.icon(),
            score: format_percentage(result.trust_score),
            error: result.error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationView {
    pub verified_count: u64,
    pub tampered_count: u64,
    pub security_percentage: String,
    /// Server order
    pub rows: Vec<VerificationRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchView {
    Empty { message: String },
    Results { heading: String, rows: Vec<FileRow> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationView {
    pub id: u64,
    pub severity: &'static str,
    pub icon: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub id: &'static str,
    pub title: &'static str,
    pub active: bool,
}

/// Counter cards; every counter reads zero until stats have loaded
pub fn stat_cards(stats: Option<&Stats>) -> Vec<StatCard> {
    let stats = stats.cloned().unwrap_or_default();
    vec![
        StatCard {
            label: "Active Files",
            value: stats.active_files.to_string(),
            icon: "file",
        },
        StatCard {
            label: "Deleted Files",
            value: stats.deleted_files.to_string(),
            icon: "trash",
        },
        StatCard {
            label: "Total Storage",
            value: format_bytes(stats.total_storage_bytes),
            icon: "database",
        },
    ]
}

pub fn dashboard_view(snapshot: &StoreSnapshot, row_limit: usize) -> DashboardView {
    let rows: Vec<FileRow> = snapshot
        .files
        .iter()
        .take(row_limit)
        .map(FileRow::from)
        .collect();

    DashboardView {
        cards: stat_cards(snapshot.stats.as_ref()),
        empty_message: rows.is_empty().then_some(EMPTY_FILES_MESSAGE),
        rows,
        total_files: snapshot.files.len(),
    }
}

pub fn upload_view(state: &UploadState) -> UploadView {
    match state {
        UploadState::Idle => UploadView::Hidden,
        UploadState::Transferring {
            file_name,
            progress,
            ..
        } => UploadView::Progress {
            file_name: file_name.clone(),
            percent: *progress,
            text: UPLOAD_PROGRESS_TEXT,
        },
        UploadState::Succeeded { summary, .. } => UploadView::Success {
            filename: summary.filename.clone(),
            size: format_bytes(summary.size),
            hash: hash_prefix(&summary.hash, BANNER_HASH_CHARS),
        },
        UploadState::Failed { reason, .. } => UploadView::Failed {
            reason: reason.clone(),
        },
    }
}

pub fn verification_view(summary: &VerificationSummary) -> VerificationView {
    VerificationView {
        verified_count: summary.verified_count,
        tampered_count: summary.tampered_count,
        security_percentage: format_percentage(summary.security_percentage),
        rows: summary.results.iter().map(VerificationRow::from).collect(),
    }
}

pub fn search_view(results: &SearchResults) -> SearchView {
    if results.is_empty() {
        return SearchView::Empty {
            message: format!("No files found matching \"{}\"", results.query),
        };
    }

    SearchView::Results {
        heading: format!(
            "Search Results for \"{}\" ({} found)",
            results.query,
            results.found()
        ),
        rows: results.results.iter().map(FileRow::from).collect(),
    }
}

pub fn notification_views(notifications: &[Notification]) -> Vec<NotificationView> {
    notifications
        .iter()
        .map(|n| NotificationView {
            id: n.id.0,
            severity: n.severity.as_str(),
            icon: n.severity.icon(),
            message: n.message.clone(),
        })
        .collect()
}

pub fn nav_items(sections: &[SectionState]) -> Vec<NavItem> {
    sections
        .iter()
        .map(|s| NavItem {
            id: s.section.id(),
            title: s.section.title(),
            active: s.active,
        })
        .collect()
}
