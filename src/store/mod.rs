mod store;
mod types;

pub use store::{DomainStore, StoreSnapshot};
pub use types::{parse_timestamp, FileRecord, Stats};
