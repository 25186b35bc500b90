mod api;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod http;
mod types;

pub use api::ApiClient;
pub use error::{TransportError, TransportResult, GENERIC_FAILURE};
pub use http::{interpret_response, HttpTransport, Transport};
pub use types::{ApiRequest, FilePayload, Method, ProgressReporter};
