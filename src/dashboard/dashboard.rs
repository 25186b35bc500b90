use crate::config::DashboardConfig;
use crate::context::Context;
use crate::dashboard::action::{Action, ActionOutcome};
use crate::dashboard::error::DashboardResult;
use crate::library::LibraryController;
use crate::navigator::{NavigationOutcome, Refresh, SectionNavigator};
use crate::notify::NotificationQueue;
use crate::search::SearchController;
use crate::store::DomainStore;
use crate::transport::{HttpTransport, Transport, TransportResult};
use crate::upload::UploadController;
use crate::verification::VerificationController;
use crate::view::{self, DashboardView, NavItem, NotificationView, SearchView, UploadView, VerificationView};
use std::sync::Arc;

/// The whole client: one controller per concern over a shared context.
pub struct Dashboard<T> {
    ctx: Arc<Context<T>>,
    library: LibraryController<T>,
    upload: UploadController<T>,
    verification: VerificationController<T>,
    search: SearchController<T>,
    navigator: SectionNavigator,
}

impl Dashboard<HttpTransport> {
    /// Talk to the service at `config.base_url` over HTTP
    pub fn connect(config: DashboardConfig) -> TransportResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(Arc::new(transport), config))
    }
}

impl<T: Transport> Dashboard<T> {
    pub fn new(transport: Arc<T>, config: DashboardConfig) -> Self {
        let ctx = Arc::new(Context::new(transport, config));
        let library = LibraryController::new(ctx.clone());

        Self {
            upload: UploadController::new(ctx.clone(), library.clone()),
            verification: VerificationController::new(ctx.clone(), library.clone()),
            search: SearchController::new(ctx.clone()),
            navigator: SectionNavigator::new(ctx.store.clone()),
            library,
            ctx,
        }
    }

    pub fn store(&self) -> &Arc<DomainStore> {
        &self.ctx.store
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.ctx.notifications
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.ctx.config
    }

    pub fn is_loading(&self) -> bool {
        self.ctx.loading.is_visible()
    }

    pub fn library(&self) -> &LibraryController<T> {
        &self.library
    }

    pub fn upload(&self) -> &UploadController<T> {
        &self.upload
    }

    pub fn verification(&self) -> &VerificationController<T> {
        &self.verification
    }

    pub fn search(&self) -> &SearchController<T> {
        &self.search
    }

    pub fn navigator(&self) -> &SectionNavigator {
        &self.navigator
    }

    /// Page load: stats and files together
    pub async fn initialize(&self) {
        let _ = self.library.initialize().await;
    }

    /// Switch sections and run whatever refreshes the new section asks for
    pub async fn navigate(&self, section_id: &str) -> NavigationOutcome {
        let outcome = self.navigator.go_to(section_id);
        if let NavigationOutcome::Moved { refreshes, .. } = &outcome {
            self.run_refreshes(refreshes).await;
        }
        outcome
    }

    async fn run_refreshes(&self, refreshes: &[Refresh]) {
        for refresh in refreshes {
            match refresh {
                Refresh::Files => {
                    let _ = self.library.refresh_files().await;
                }
                Refresh::VerificationSummary => {
                    self.verification.reveal_summary();
                }
            }
        }
    }

    /// Route one user action to the controller that owns it.
    ///
    /// Failures have already produced their notification by the time they are returned.
    pub async fn dispatch(&self, action: Action) -> DashboardResult<ActionOutcome> {
        tracing::debug!(action = action.name(), "dispatch");

        let outcome = match action {
            Action::Navigate(section) => ActionOutcome::Navigated(self.navigate(&section).await),
            Action::SelectFile(file) => {
                let name = file.name.clone();
                self.upload.select(file);
                ActionOutcome::Selected(name)
            }
            Action::DropFiles(files) => ActionOutcome::Uploaded(self.upload.drop_files(files).await?),
            Action::UploadSelected => ActionOutcome::Uploaded(self.upload.upload_selected().await?),
            Action::Upload(file) => ActionOutcome::Uploaded(self.upload.begin_upload(file).await?),
            Action::UploadPath(path) => {
                ActionOutcome::Uploaded(self.upload.begin_upload_path(&path).await?)
            }
            Action::VerifyFile(filename) => {
                ActionOutcome::Verified(self.verification.verify_single(&filename).await?)
            }
            Action::VerifyAll => ActionOutcome::VerifiedAll(self.verification.verify_all().await?),
            Action::Delete(filename) => {
                self.library.delete_file(&filename).await?;
                ActionOutcome::Deleted(filename)
            }
            Action::Search(query) => ActionOutcome::Searched(self.search.search(&query).await?),
            Action::Refresh => {
                let _ = self.library.refresh_files().await;
                let _ = self.library.load_stats().await;
                ActionOutcome::Refreshed
            }
        };

        Ok(outcome)
    }

    // ============== Views ==============

    pub fn dashboard_view(&self) -> DashboardView {
        view::dashboard_view(&self.ctx.store.snapshot(), self.ctx.config.dashboard_row_limit)
    }

    pub fn upload_view(&self) -> UploadView {
        view::upload_view(&self.upload.state())
    }

    /// `None` until a batch has run and the summary panel is shown
    pub fn verification_view(&self) -> Option<VerificationView> {
        if !self.verification.is_summary_visible() {
            return None;
        }
        self.verification
            .summary()
            .map(|summary| view::verification_view(&summary))
    }

    pub fn search_view(&self) -> Option<SearchView> {
        self.search.results().map(|results| view::search_view(&results))
    }

    pub fn notification_views(&self) -> Vec<NotificationView> {
        view::notification_views(&self.ctx.notifications.active())
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        view::nav_items(&self.navigator.sections())
    }
}
