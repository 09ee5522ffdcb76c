//! Entity persistence API.

use std::future::Future;
use std::time::Duration;

use shelf_config::ShelfConfig;
use shelf_core::{CatalogEntity, CatalogRecord};
use thiserror::Error;

const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));

/// Failure reported by (or on the way to) the persistence API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("catalog API error ({status}): {message}")]
pub struct ApiError {
    /// HTTP status, or 0 when no response was received.
    pub status: u16,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self {
            status: error.status().map_or(0, |s| s.as_u16()),
            message: error.to_string(),
        }
    }
}

/// Create, update and fetch catalog entities.
pub trait CatalogApi: Send + Sync {
    fn create(
        &self,
        scope: &str,
        record: &CatalogRecord,
    ) -> impl Future<Output = Result<CatalogEntity, ApiError>> + Send;

    fn update(
        &self,
        id: &str,
        record: &CatalogRecord,
    ) -> impl Future<Output = Result<CatalogEntity, ApiError>> + Send;

    fn fetch(&self, id: &str) -> impl Future<Output = Result<CatalogEntity, ApiError>> + Send;
}

/// REST client for the vendor product endpoints.
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogApi {
    /// # Errors
    ///
    /// Returns [`ApiError`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] if the HTTP client cannot be built.
    pub fn from_config(config: &ShelfConfig) -> Result<Self, ApiError> {
        Self::new(config.api.base_url.clone(), config.api.timeout())
    }

    #[must_use]
    pub fn create_url(&self, scope: &str) -> String {
        format!(
            "{}/api/vendors/{}/products",
            self.base_url,
            urlencoding::encode(scope)
        )
    }

    #[must_use]
    pub fn entity_url(&self, id: &str) -> String {
        format!(
            "{}/api/vendor-products/{}",
            self.base_url,
            urlencoding::encode(id)
        )
    }

    async fn entity(resp: reqwest::Response) -> Result<CatalogEntity, ApiError> {
        let resp = check_response(resp).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::new(0, format!("unexpected response body: {e}")))
    }
}

impl CatalogApi for HttpCatalogApi {
    async fn create(&self, scope: &str, record: &CatalogRecord) -> Result<CatalogEntity, ApiError> {
        let resp = self
            .http
            .post(self.create_url(scope))
            .json(record)
            .send()
            .await?;
        Self::entity(resp).await
    }

    async fn update(&self, id: &str, record: &CatalogRecord) -> Result<CatalogEntity, ApiError> {
        let resp = self
            .http
            .patch(self.entity_url(id))
            .json(record)
            .send()
            .await?;
        Self::entity(resp).await
    }

    async fn fetch(&self, id: &str) -> Result<CatalogEntity, ApiError> {
        let resp = self.http.get(self.entity_url(id)).send().await?;
        Self::entity(resp).await
    }
}

/// Non-2xx responses become [`ApiError`], preferring a JSON `message` field
/// over the raw body.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::new(status.as_u16(), error_message(&body)))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
