use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{AuthResponse, Credentials, HistoryEntry, PredictionRecord, ServiceStatus};
use super::{decode, ApiError, ApiResult};
use crate::capture::ImageRef;
use crate::session::UserId;

/// Stateless HTTP client for the classification backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/register`
    pub async fn register(&self, email: String, password: String) -> ApiResult<AuthResponse> {
        let body = Credentials { email, password };
        self.send(self.http.post(self.url("/api/register")).json(&body))
            .await
    }

    /// `POST /api/login`
    pub async fn login(&self, email: String, password: String) -> ApiResult<AuthResponse> {
        let body = Credentials { email, password };
        self.send(self.http.post(self.url("/api/login")).json(&body))
            .await
    }

    /// `GET /api/history?user_id=<id>`, in server order
    pub async fn history(&self, user_id: UserId) -> ApiResult<Vec<HistoryEntry>> {
        let request = self
            .http
            .get(self.url("/api/history"))
            .query(&[("user_id", user_id.0)]);
        self.send(request).await
    }

    /// `POST /api/predict` as multipart form with `user_id` and `image`
    pub async fn predict(&self, user_id: UserId, image: ImageRef) -> ApiResult<PredictionRecord> {
        let bytes = tokio::fs::read(&image.uri)
            .await
            .map_err(|e| ApiError::new(format!("Could not read image: {}", e)))?;

        let part = Part::bytes(bytes)
            .file_name(image.name.clone())
            .mime_str(&image.mime)
            .map_err(|e| ApiError::new(format!("Could not read image: {}", e)))?;

        let form = Form::new()
            .text("user_id", user_id.to_string())
            .part("image", part);

        self.send(self.http.post(self.url("/api/predict")).multipart(form))
            .await
    }

    /// `GET /`, the backend liveness message
    pub async fn ping(&self) -> ApiResult<String> {
        let status: ServiceStatus = self.send(self.http.get(self.url("/"))).await?;
        Ok(status.message)
    }

    /// Perform one request and decode its response
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(|e| ApiError::network(&e))?;
        let status = response.status();
        debug!("🌐 {} {}", status.as_u16(), response.url().path());

        let body = response.bytes().await.map_err(|e| ApiError::network(&e))?;
        decode(status, &body)
    }
}
