use crate::navigator::types::{refreshes_for, NavigationOutcome, Section};
use crate::store::DomainStore;
use parking_lot::RwLock;
use std::sync::Arc;

/// Visibility flag of one section (and its navigation link).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionState {
    pub section: Section,
    pub active: bool,
}

/// Switches the visible section and reports which refreshes the switch triggers.
///
/// The navigator itself performs no I/O; the caller runs the returned refreshes.
pub struct SectionNavigator {
    store: Arc<DomainStore>,
    visual: RwLock<Vec<SectionState>>,
}

impl SectionNavigator {
    pub fn new(store: Arc<DomainStore>) -> Self {
        let current = store.current_section();
        let visual = Section::ALL
            .into_iter()
            .map(|section| SectionState {
                section,
                active: section == current,
            })
            .collect();

        Self {
            store,
            visual: RwLock::new(visual),
        }
    }

    pub fn current(&self) -> Section {
        self.store.current_section()
    }

    /// Navigate to `section_id`; unknown identifiers leave everything as it was.
    pub fn go_to(&self, section_id: &str) -> NavigationOutcome {
        let section = match section_id.parse::<Section>() {
            Ok(section) => section,
            Err(e) => {
                let current = self.current();
                tracing::warn!(error = %e, current = %current, "navigation ignored");
                return NavigationOutcome::Stayed { section: current };
            }
        };
        self.activate(section)
    }

    pub fn activate(&self, section: Section) -> NavigationOutcome {
        {
            let mut visual = self.visual.write();
            for state in visual.iter_mut() {
                state.active = state.section == section;
            }
        }
        self.store.set_current_section(section);

        let refreshes = refreshes_for(section);
        tracing::debug!(section = %section, ?refreshes, "section activated");
        NavigationOutcome::Moved { section, refreshes }
    }

    pub fn sections(&self) -> Vec<SectionState> {
        self.visual.read().clone()
    }

    pub fn active_sections(&self) -> Vec<Section> {
        self.visual
            .read()
            .iter()
            .filter(|s| s.active)
            .map(|s| s.section)
            .collect()
    }
}
