use crate::search::SearchResults;
use crate::store::{FileRecord, Stats};
use crate::transport::error::TransportResult;
use crate::transport::http::Transport;
use crate::transport::types::{ApiRequest, FilePayload, ProgressReporter};
use crate::upload::UploadSummary;
use crate::verification::{BatchVerification, VerificationResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct FilesEnvelope {
    #[serde(default)]
    files: Vec<FileRecord>,
}

/// Typed calls for each endpoint of the storage-verification service.
pub struct ApiClient<T> {
    transport: Arc<T>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// GET /api/stats
    pub async fn stats(&self) -> TransportResult<Stats> {
        let value = self.transport.execute(ApiRequest::get("/api/stats")).await?;
        Ok(decode::<DataEnvelope<Stats>>(value)?.data)
    }

    /// GET /api/files
    pub async fn list_files(&self) -> TransportResult<Vec<FileRecord>> {
        let value = self.transport.execute(ApiRequest::get("/api/files")).await?;
        Ok(decode::<FilesEnvelope>(value)?.files)
    }

    /// POST /api/upload (multipart field `file`)
    pub async fn upload(
        &self,
        payload: FilePayload,
        progress: ProgressReporter,
    ) -> TransportResult<UploadSummary> {
        let value = self
            .transport
            .upload(ApiRequest::post("/api/upload"), payload, progress)
            .await?;
        Ok(decode::<DataEnvelope<UploadSummary>>(value)?.data)
    }

    /// GET /api/verify/{filename}
    pub async fn verify(&self, filename: &str) -> TransportResult<VerificationResult> {
        let request = ApiRequest::get("/api/verify").segment(filename);
        let value = self.transport.execute(request).await?;
        Ok(decode::<DataEnvelope<VerificationResult>>(value)?.data)
    }

    /// POST /api/verify-all
    pub async fn verify_all(&self) -> TransportResult<BatchVerification> {
        let value = self
            .transport
            .execute(ApiRequest::post("/api/verify-all"))
            .await?;
        Ok(decode::<DataEnvelope<BatchVerification>>(value)?.data)
    }

    /// DELETE /api/delete/{filename}
    pub async fn delete(&self, filename: &str) -> TransportResult<()> {
        let request = ApiRequest::delete("/api/delete").segment(filename);
        self.transport.execute(request).await?;
        Ok(())
    }

    /// GET /api/search?q={query}
    pub async fn search(&self, query: &str) -> TransportResult<SearchResults> {
        let request = ApiRequest::get("/api/search").query("q", query);
        let value = self.transport.execute(request).await?;
        Ok(decode::<DataEnvelope<SearchResults>>(value)?.data)
    }
}

fn decode<D: DeserializeOwned>(value: Value) -> TransportResult<D> {
    Ok(serde_json::from_value(value)?)
}
