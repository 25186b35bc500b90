use crate::transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Please enter a search term")]
    EmptyQuery,

    #[error("{0}")]
    Transport(#[from] TransportError),
}

impl SearchError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SearchError::EmptyQuery)
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
