use crate::navigator::Section;
use crate::store::types::{FileRecord, Stats};
use parking_lot::RwLock;
use tokio::time::Instant;

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub files: Vec<FileRecord>,
    pub stats: Option<Stats>,
    pub current_section: Section,
}

#[derive(Debug)]
struct SessionState {
    files: Vec<FileRecord>,
    stats: Option<Stats>,
    current_section: Section,
    files_completed_at: Option<Instant>,
    stats_completed_at: Option<Instant>,
}

/// In-memory session state shared by every controller.
///
/// `files` and `stats` are only ever replaced in full. Each replacement carries the
/// instant its fetch resolved; a replacement that resolved earlier than the one
/// already applied is discarded, so the latest completed fetch always wins.
#[derive(Debug)]
pub struct DomainStore {
    state: RwLock<SessionState>,
}

impl Default for DomainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState {
                files: Vec::new(),
                stats: None,
                current_section: Section::default(),
                files_completed_at: None,
                stats_completed_at: None,
            }),
        }
    }

    pub fn files(&self) -> Vec<FileRecord> {
        self.state.read().files.clone()
    }

    pub fn file_count(&self) -> usize {
        self.state.read().files.len()
    }

    pub fn stats(&self) -> Option<Stats> {
        self.state.read().stats.clone()
    }

    pub fn current_section(&self) -> Section {
        self.state.read().current_section
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read();
        StoreSnapshot {
            files: state.files.clone(),
            stats: state.stats.clone(),
            current_section: state.current_section,
        }
    }

    /// Replace the file list with the result of a fetch that resolved at `completed_at`.
    /// Returns false when a later fetch has already been applied.
    pub fn replace_files(&self, files: Vec<FileRecord>, completed_at: Instant) -> bool {
        let mut state = self.state.write();
        if state.files_completed_at.is_some_and(|applied| applied > completed_at) {
            tracing::debug!(count = files.len(), "discarding stale file list");
            return false;
        }
        tracing::debug!(count = files.len(), "file list replaced");
        state.files = files;
        state.files_completed_at = Some(completed_at);
        true
    }

    pub fn replace_stats(&self, stats: Stats, completed_at: Instant) -> bool {
        let mut state = self.state.write();
        if state.stats_completed_at.is_some_and(|applied| applied > completed_at) {
            tracing::debug!("discarding stale stats");
            return false;
        }
        state.stats = Some(stats);
        state.stats_completed_at = Some(completed_at);
        true
    }

    pub(crate) fn set_current_section(&self, section: Section) {
        self.state.write().current_section = section;
    }
}
