use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One top-level view of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Upload,
    Verify,
    Search,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Upload,
        Section::Verify,
        Section::Search,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Upload => "upload",
            Section::Verify => "verify",
            Section::Search => "search",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Upload => "Upload",
            Section::Verify => "Verify",
            Section::Search => "Search",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = NavigationError;

    /// Accepts `verify` as well as link-style `#verify`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().trim_start_matches('#');
        Section::ALL
            .into_iter()
            .find(|section| section.id() == id)
            .ok_or_else(|| NavigationError::UnknownSection(s.to_string()))
    }
}

/// Data reload a section asks for when it becomes visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Refresh {
    Files,
    /// Re-show the last batch verification summary
    VerificationSummary,
}

/// Section → refreshes triggered on entry.
pub const REFRESH_POLICY: &[(Section, &[Refresh])] = &[
    (Section::Dashboard, &[Refresh::Files]),
    (Section::Upload, &[]),
    (Section::Verify, &[Refresh::Files, Refresh::VerificationSummary]),
    (Section::Search, &[]),
];

pub fn refreshes_for(section: Section) -> &'static [Refresh] {
    REFRESH_POLICY
        .iter()
        .find(|(s, _)| *s == section)
        .map(|(_, refreshes)| *refreshes)
        .unwrap_or(&[])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Moved {
        section: Section,
        refreshes: &'static [Refresh],
    },
    /// Unknown identifier; the current section stays visible
    Stayed { section: Section },
}

impl NavigationOutcome {
    pub fn section(&self) -> Section {
        match self {
            NavigationOutcome::Moved { section, .. } | NavigationOutcome::Stayed { section } => {
                *section
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Unknown section: {0}")]
    UnknownSection(String),
}
