use crate::store::FileRecord;
use serde::{Deserialize, Serialize};

/// Matches for one query; kept apart from the store's file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub results: Vec<FileRecord>,
}

impl SearchResults {
    /// Number of matches; the result list stands in when the service omits `count`
    pub fn found(&self) -> usize {
        self.count.max(self.results.len())
    }

    pub fn is_empty(&self) -> bool {
        self.found() == 0
    }
}
