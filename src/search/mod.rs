mod controller;
mod error;
mod types;

pub use controller::SearchController;
pub use error::{SearchError, SearchResult};
pub use types::SearchResults;
