use crate::config::DashboardConfig;
use crate::metrics::recorder;
use crate::transport::error::{TransportError, TransportResult, GENERIC_FAILURE};
use crate::transport::types::{ApiRequest, FilePayload, ProgressReporter};
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::future::Future;
use std::time::Instant;
use url::Url;

/// Executes requests against the storage-verification service.
///
/// Every failure comes back as a [`TransportError`]; implementations never panic
/// and never retry.
pub trait Transport: Send + Sync + 'static {
    /// Send a JSON request and parse the JSON response
    fn execute(&self, request: ApiRequest) -> impl Future<Output = TransportResult<Value>> + Send;

    /// Send `payload` as multipart form data, reporting progress as bytes leave
    fn upload(
        &self,
        request: ApiRequest,
        payload: FilePayload,
        progress: ProgressReporter,
    ) -> impl Future<Output = TransportResult<Value>> + Send;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    chunk_size: usize,
}

impl HttpTransport {
    pub fn new(config: &DashboardConfig) -> TransportResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            chunk_size: config.upload_chunk_size.max(1),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, request: &ApiRequest) -> TransportResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    async fn read_json(response: reqwest::Response, fallback: &str) -> TransportResult<Value> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        interpret_response(status, &body, fallback)
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> TransportResult<Value> {
        let url = self.url_for(&request)?;
        tracing::debug!(request = %request, "sending request");

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .header(CONTENT_TYPE, "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let result = match builder.send().await {
            Ok(response) => Self::read_json(response, GENERIC_FAILURE).await,
            Err(e) => Err(TransportError::from(e)),
        };
        recorder::record_request(request.method.as_str(), result.is_ok(), started.elapsed());

        if let Err(e) = &result {
            tracing::debug!(request = %request, error = %e, "request failed");
        }
        result
    }

    async fn upload(
        &self,
        request: ApiRequest,
        payload: FilePayload,
        progress: ProgressReporter,
    ) -> TransportResult<Value> {
        let url = self.url_for(&request)?;
        let total = payload.size();
        tracing::debug!(request = %request, file = %payload.file_name, bytes = total, "starting upload");

        let chunks = split_body(&payload.bytes, self.chunk_size);
        let reporter = progress.clone();
        let mut sent = 0u64;
        let body = stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            reporter.report_bytes(sent, total);
            Ok::<Bytes, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
            .file_name(payload.file_name.clone());
        let form = Form::new().part(payload.field.clone(), part);

        let mut builder = self.client.request(request.method.into(), url).multipart(form);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let started = Instant::now();
        let result = match builder.send().await {
            Ok(response) => Self::read_json(response, GENERIC_FAILURE).await,
            Err(e) => Err(TransportError::from(e)),
        };
        recorder::record_request(request.method.as_str(), result.is_ok(), started.elapsed());

        if result.is_ok() {
            progress.report(100);
        }
        result
    }
}

/// Turn a status code and raw body into the uniform result shape.
///
/// Non-2xx is always a failure; its message is the body's `error` field when the body
/// is a JSON object carrying one, `fallback` otherwise. A 2xx with an empty body is
/// read as `{}`.
pub fn interpret_response(status: u16, body: &[u8], fallback: &str) -> TransportResult<Value> {
    let success = (200..300).contains(&status);

    if body.iter().all(u8::is_ascii_whitespace) {
        return if success {
            Ok(Value::Object(Default::default()))
        } else {
            Err(TransportError::Status {
                status,
                message: fallback.to_string(),
            })
        };
    }

    let parsed = serde_json::from_slice::<Value>(body);
    if success {
        return parsed.map_err(TransportError::from);
    }

    let message = parsed
        .ok()
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| fallback.to_string());

    Err(TransportError::Status { status, message })
}

fn split_body(bytes: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    let chunk_size = chunk_size.max(1);
    (0..bytes.len())
        .step_by(chunk_size)
        .map(|start| bytes.slice(start..(start + chunk_size).min(bytes.len())))
        .collect()
}
