//! In-process stand-in for the storage-verification service.

#![allow(dead_code)]

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use integrity_dashboard::{Dashboard, DashboardConfig};
use integrity_dashboard::transport::HttpTransport;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub hash: String,
    pub uploaded_at: chrono::NaiveDateTime,
}

#[derive(Default)]
pub struct MockState {
    files: Mutex<Vec<StoredFile>>,
    tampered: Mutex<HashSet<String>>,
    deleted: AtomicUsize,
    requests: AtomicUsize,
    failing: AtomicBool,
    bare_failures: AtomicBool,
    next_hash: Mutex<Option<String>>,
    uploads: Mutex<HashMap<String, Vec<u8>>>,
}

/// A running mock service bound to a random local port.
pub struct MockService {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockService {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn config(&self) -> DashboardConfig {
        DashboardConfig::with_base_url(&self.base_url())
            .unwrap()
            .with_request_timeout(Duration::from_secs(5))
    }

    pub fn dashboard(&self) -> Dashboard<HttpTransport> {
        Dashboard::connect(self.config()).unwrap()
    }

    /// Store a file directly, as if uploaded earlier
    pub fn seed(&self, name: &str, content: &[u8]) {
        self.state.files.lock().push(StoredFile {
            name: name.to_string(),
            size: content.len() as u64,
            hash: fingerprint(content),
            uploaded_at: chrono::Utc::now().naive_utc(),
        });
    }

    /// Make every later verification of `name` report tampering
    pub fn tamper(&self, name: &str) {
        self.state.tampered.lock().insert(name.to_string());
    }

    /// Hash reported for the next upload instead of the computed one
    pub fn set_next_hash(&self, hash: &str) {
        *self.state.next_hash.lock() = Some(hash.to_string());
    }

    /// Answer every request with a 500
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Answer every request with an empty-bodied 500
    pub fn set_bare_failures(&self, bare: bool) {
        self.state.bare_failures.store(bare, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub fn file_names(&self) -> Vec<String> {
        self.state.files.lock().iter().map(|f| f.name.clone()).collect()
    }

    pub fn uploaded_bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.state.uploads.lock().get(name).cloned()
    }
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/stats", get(stats))
        .route("/api/files", get(list_files))
        .route("/api/upload", post(upload))
        .route("/api/verify/:filename", get(verify))
        .route("/api/verify-all", post(verify_all))
        .route("/api/delete/:filename", delete(delete_file))
        .route("/api/search", get(search))
        .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .with_state(state)
}

async fn count_requests(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if state.bare_failures.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if state.failing.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Service unavailable");
    }
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Content digest the mock reports as the stored hash
pub fn fingerprint(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

fn file_json(file: &StoredFile) -> Value {
    json!({
        "file_name": file.name,
        "file_size": file.size,
        "hash": file.hash,
        "upload_date": file.uploaded_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        "verify_count": 0
    })
}

fn verification_json(state: &MockState, file: &StoredFile) -> Value {
    let tampered = state.tampered.lock().contains(&file.name);
    let downloaded = if tampered {
        fingerprint(file.name.as_bytes())
    } else {
        file.hash.clone()
    };
    json!({
        "filename": file.name,
        "is_intact": !tampered,
        "trust_score": if tampered { 40 } else { 100 },
        "original_hash": file.hash,
        "downloaded_hash": downloaded,
        "file_size": file.size,
        "verification_time": chrono::Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    })
}

async fn stats(State(state): State<Arc<MockState>>) -> Json<Value> {
    let files = state.files.lock();
    Json(json!({
        "success": true,
        "data": {
            "active_files": files.len(),
            "deleted_files": state.deleted.load(Ordering::SeqCst),
            "total_storage_bytes": files.iter().map(|f| f.size).sum::<u64>()
        }
    }))
}

async fn list_files(State(state): State<Arc<MockState>>) -> Json<Value> {
    let files: Vec<Value> = state.files.lock().iter().rev().map(file_json).collect();
    Json(json!({ "success": true, "files": files, "count": files.len() }))
}

async fn upload(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> Response {
    let mut received = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => received = Some((name, bytes.to_vec())),
            Err(_) => return error(StatusCode::BAD_REQUEST, "Failed to read file data"),
        }
    }

    let Some((name, content)) = received else {
        return error(StatusCode::BAD_REQUEST, "No file provided");
    };
    if name.is_empty() {
        return error(StatusCode::BAD_REQUEST, "No file selected");
    }

    let hash = state
        .next_hash
        .lock()
        .take()
        .unwrap_or_else(|| fingerprint(&content));
    let file = StoredFile {
        name: name.clone(),
        size: content.len() as u64,
        hash: hash.clone(),
        uploaded_at: chrono::Utc::now().naive_utc(),
    };
    state.files.lock().push(file.clone());
    state.uploads.lock().insert(name.clone(), content);

    Json(json!({
        "success": true,
        "message": "File uploaded successfully",
        "data": {
            "filename": file.name,
            "size": file.size,
            "hash": hash,
            "drive_id": format!("drive-{}", file.name),
            "upload_time": file.uploaded_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
        }
    }))
    .into_response()
}

async fn verify(State(state): State<Arc<MockState>>, Path(filename): Path<String>) -> Response {
    let file = state.files.lock().iter().find(|f| f.name == filename).cloned();
    match file {
        Some(file) => Json(json!({ "success": true, "data": verification_json(&state, &file) }))
            .into_response(),
        None => error(StatusCode::NOT_FOUND, "File not found"),
    }
}

async fn verify_all(State(state): State<Arc<MockState>>) -> Json<Value> {
    let files = state.files.lock().clone();
    let results: Vec<Value> = files.iter().map(|f| verification_json(&state, f)).collect();
    let tampered = results
        .iter()
        .filter(|r| r["is_intact"] == Value::Bool(false))
        .count();
    let verified = results.len() - tampered;
    let percentage = if results.is_empty() {
        0.0
    } else {
        verified as f64 / results.len() as f64 * 100.0
    };

    Json(json!({
        "success": true,
        "data": {
            "total_files": results.len(),
            "verified_count": verified,
            "tampered_count": tampered,
            "security_percentage": percentage,
            "results": results
        }
    }))
}

async fn delete_file(State(state): State<Arc<MockState>>, Path(filename): Path<String>) -> Response {
    let mut files = state.files.lock();
    let before = files.len();
    files.retain(|f| f.name != filename);
    if files.len() == before {
        return error(StatusCode::NOT_FOUND, "File not found");
    }
    state.deleted.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "success": true, "message": format!("File {filename} deleted successfully") }))
        .into_response()
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search(State(state): State<Arc<MockState>>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.trim().to_lowercase();
    if query.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Search query required");
    }

    let results: Vec<Value> = state
        .files
        .lock()
        .iter()
        .filter(|f| f.name.to_lowercase().contains(&query) || f.hash.starts_with(&query))
        .map(file_json)
        .collect();

    Json(json!({
        "success": true,
        "data": { "query": params.q, "count": results.len(), "results": results }
    }))
    .into_response()
}
