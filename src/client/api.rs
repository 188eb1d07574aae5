//! Backend API Client
//!
//! Async HTTP client for the camera/alert REST backend. Every request runs
//! under the configured deadline and carries the cookie store, and every
//! failure is reported as an [`ApiError`].

use crate::client::config::Config;
use crate::shared::alert::AlertRecord;
use crate::shared::camera::{CameraInput, CameraRecord};
use crate::shared::error::ApiError;
use bytes::Bytes;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;

/// Backend API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    client: Client,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::NetworkUnreachable(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send a request and decode a JSON response body
    pub async fn request_json<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.config.api_url(path);
        tracing::debug!(%method, %url, "API request");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        self.with_deadline(async {
            let response = request.send().await.map_err(transport_error)?;
            let response = ensure_success(response).await?;
            let raw = response.bytes().await.map_err(transport_error)?;
            Ok(serde_json::from_slice::<T>(&raw)?)
        })
        .await
    }

    /// Fetch a binary resource
    pub async fn request_blob(&self, path: &str) -> Result<Bytes, ApiError> {
        let url = self.config.api_url(path);
        tracing::debug!(%url, "API blob request");

        let request = self.client.get(&url);
        self.with_deadline(async {
            let response = request.send().await.map_err(transport_error)?;
            let response = ensure_success(response).await?;
            response.bytes().await.map_err(transport_error)
        })
        .await
    }

    async fn with_deadline<T>(&self, fut: impl Future<Output = Result<T, ApiError>>) -> Result<T, ApiError> {
        let deadline = self.config.request_timeout();
        match tokio::time::timeout(deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(deadline)),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json::<T, ()>(Method::GET, path, None).await
    }

    /// `GET /cameras/?skip=&limit=`
    pub async fn list_cameras(&self, skip: u32, limit: u32) -> Result<Vec<CameraRecord>, ApiError> {
        self.get_json(&format!("/cameras/?skip={}&limit={}", skip, limit)).await
    }

    /// `GET /cameras/{id}`
    pub async fn get_camera(&self, id: i64) -> Result<CameraRecord, ApiError> {
        self.get_json(&format!("/cameras/{}", id)).await
    }

    /// `GET /cameras/{id}/snapshot`
    pub async fn camera_snapshot(&self, id: i64) -> Result<Bytes, ApiError> {
        self.request_blob(&format!("/cameras/{}/snapshot", id)).await
    }

    /// `POST /cameras/`
    pub async fn create_camera(&self, input: &CameraInput) -> Result<CameraRecord, ApiError> {
        self.request_json(Method::POST, "/cameras/", Some(input)).await
    }

    /// `PUT /cameras/{id}`
    pub async fn update_camera(&self, id: i64, input: &CameraInput) -> Result<CameraRecord, ApiError> {
        self.request_json(Method::PUT, &format!("/cameras/{}", id), Some(input)).await
    }

    /// `DELETE /cameras/{id}`, returns the backend's confirmation payload
    pub async fn delete_camera(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.request_json::<_, ()>(Method::DELETE, &format!("/cameras/{}", id), None).await
    }

    /// `GET /alerts/?skip=&limit=`
    pub async fn list_alerts(&self, skip: u32, limit: u32) -> Result<Vec<AlertRecord>, ApiError> {
        self.get_json(&format!("/alerts/?skip={}&limit={}", skip, limit)).await
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| status.to_string());
    tracing::warn!(status = status.as_u16(), %body, "API request failed");
    Err(ApiError::Http {
        status: status.as_u16(),
        body,
    })
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::NetworkUnreachable(err.to_string())
    }
}
