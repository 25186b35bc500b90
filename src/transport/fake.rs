//! Scripted in-memory transport for unit tests.

use crate::transport::error::{TransportError, TransportResult};
use crate::transport::http::Transport;
use crate::transport::types::{ApiRequest, FilePayload, Method, ProgressReporter};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Notify;

type Script = VecDeque<TransportResult<Value>>;

#[derive(Default)]
pub struct FakeTransport {
    scripts: Mutex<HashMap<(Method, String), Script>>,
    requests: Mutex<Vec<ApiRequest>>,
    uploads: Mutex<Vec<FilePayload>>,
    progress_steps: Mutex<Vec<u8>>,
    upload_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response; the last queued response for a route is repeated.
    pub fn respond(&self, method: Method, path: &str, response: TransportResult<Value>) {
        self.scripts
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Progress percentages the next uploads report before answering
    pub fn set_progress_steps(&self, steps: Vec<u8>) {
        *self.progress_steps.lock() = steps;
    }

    /// Make uploads wait until [`FakeTransport::release_upload`] is called
    pub fn hold_uploads(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.upload_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn release_upload(&self) {
        if let Some(gate) = self.upload_gate.lock().as_ref() {
            gate.notify_one();
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.to_string()).collect()
    }

    pub fn uploads(&self) -> Vec<FilePayload> {
        self.uploads.lock().clone()
    }

    fn next_response(&self, request: &ApiRequest) -> TransportResult<Value> {
        let mut scripts = self.scripts.lock();
        let key = (request.method, request.path());
        match scripts.get_mut(&key) {
            Some(script) if script.len() > 1 => script.pop_front().unwrap_or_else(unscripted),
            Some(script) => script.front().cloned().unwrap_or_else(unscripted),
            None => Err(TransportError::Status {
                status: 404,
                message: format!("no script for {request}"),
            }),
        }
    }
}

fn unscripted() -> TransportResult<Value> {
    Err(TransportError::Network("unscripted".into()))
}

impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> TransportResult<Value> {
        self.requests.lock().push(request.clone());
        tokio::task::yield_now().await;
        self.next_response(&request)
    }

    async fn upload(
        &self,
        request: ApiRequest,
        payload: FilePayload,
        progress: ProgressReporter,
    ) -> TransportResult<Value> {
        self.requests.lock().push(request.clone());
        self.uploads.lock().push(payload);

        let steps = self.progress_steps.lock().clone();
        for step in steps {
            progress.report(step);
            tokio::task::yield_now().await;
        }

        let gate = self.upload_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let response = self.next_response(&request);
        if response.is_ok() {
            progress.report(100);
        }
        response
    }
}
