use crate::context::Context;
use crate::search::error::{SearchError, SearchResult};
use crate::search::types::SearchResults;
use crate::transport::Transport;
use parking_lot::RwLock;
use std::sync::Arc;

/// Sends search queries and keeps the latest result set.
///
/// Searching never touches the store's file list.
pub struct SearchController<T> {
    ctx: Arc<Context<T>>,
    results: RwLock<Option<SearchResults>>,
}

impl<T: Transport> SearchController<T> {
    pub fn new(ctx: Arc<Context<T>>) -> Self {
        Self {
            ctx,
            results: RwLock::new(None),
        }
    }

    /// Results of the last successful search
    pub fn results(&self) -> Option<SearchResults> {
        self.results.read().clone()
    }

    pub async fn search(&self, query: &str) -> SearchResult<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            let err = SearchError::EmptyQuery;
            self.ctx.notifications.warning(err.to_string());
            return Err(err);
        }

        let _loading = self.ctx.loading.begin();
        match self.ctx.api.search(query).await {
            Ok(results) => {
                tracing::debug!(query, count = results.found(), "search complete");
                *self.results.write() = Some(results.clone());
                Ok(results)
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "search failed");
                self.ctx.notifications.error(format!("Search failed: {e}"));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::notify::Severity;
    use crate::transport::fake::FakeTransport;
    use crate::transport::{Method, TransportError};
    use serde_json::json;

    fn setup() -> (Arc<FakeTransport>, Arc<Context<FakeTransport>>, SearchController<FakeTransport>) {
        let fake = Arc::new(FakeTransport::new());
        let ctx = Arc::new(Context::new(fake.clone(), DashboardConfig::default()));
        let search = SearchController::new(ctx.clone());
        (fake, ctx, search)
    }

    #[tokio::test]
    async fn test_blank_query_never_hits_network() {
        let (fake, ctx, search) = setup();

        for query in ["", "   ", "\t\n"] {
            let err = search.search(query).await.unwrap_err();
            assert!(err.is_validation());
        }

        assert_eq!(fake.request_count(), 0);
        let notes = ctx.notifications.active();
        assert_eq!(notes.len(), 3);
        assert!(notes.iter().all(|n| n.severity == Severity::Warning));
        assert_eq!(notes[0].message, "Please enter a search term");
    }

    #[tokio::test]
    async fn test_search_trims_and_keeps_store() {
        let (fake, ctx, search) = setup();
        fake.respond(
            Method::Get,
            "/api/search",
            Ok(json!({"data": {"query": "rep", "count": 0, "results": []}})),
        );

        let results = search.search("  rep ").await.unwrap();
        assert!(results.is_empty());
        assert_eq!(fake.paths(), vec!["GET /api/search?q=rep"]);
        assert_eq!(ctx.store.file_count(), 0);
        assert_eq!(search.results().unwrap().query, "rep");
        assert!(ctx.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_notifies() {
        let (fake, ctx, search) = setup();
        fake.respond(
            Method::Get,
            "/api/search",
            Err(TransportError::Status {
                status: 400,
                message: "Search query required".into(),
            }),
        );

        let err = search.search("x").await.unwrap_err();
        assert!(!err.is_validation());
        assert!(search.results().is_none());
        assert_eq!(
            ctx.notifications.active()[0].message,
            "Search failed: Search query required"
        );
        assert!(!ctx.loading.is_visible());
    }
}
