//! Primary upload path: the remote asset endpoint.

use std::future::Future;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use shelf_config::ShelfConfig;

use crate::error::UploadError;
use crate::http::check_response;
use crate::source::SourceFile;

const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));

/// Who the upload is for and which bucket it lands in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadScope {
    pub vendor_id: String,
    pub category: String,
}

impl UploadScope {
    #[must_use]
    pub fn new(vendor_id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            category: category.into(),
        }
    }
}

/// What the endpoint hands back for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedAsset {
    pub url: String,
    #[serde(default)]
    pub key: Option<String>,
}

/// A remote store for asset bytes.
pub trait AssetUploader: Send + Sync {
    /// Store one file and return its public URL.
    fn upload(
        &self,
        file: &SourceFile,
        scope: &UploadScope,
    ) -> impl Future<Output = Result<UploadedAsset, UploadError>> + Send;
}

/// Multipart POST to the public upload endpoint.
#[derive(Debug, Clone)]
pub struct HttpAssetUploader {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAssetUploader {
    /// # Errors
    ///
    /// Returns [`UploadError::Http`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint and timeout from the `api` and `media` config sections.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &ShelfConfig) -> Result<Self, UploadError> {
        Self::new(
            config.api.url(&config.media.upload_path),
            config.media.upload_timeout(),
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl AssetUploader for HttpAssetUploader {
    async fn upload(
        &self,
        file: &SourceFile,
        scope: &UploadScope,
    ) -> Result<UploadedAsset, UploadError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("vendorId", scope.vendor_id.clone())
            .text("category", scope.category.clone())
            .text("isPublic", "true");

        let resp = self.client.post(&self.endpoint).multipart(form).send().await?;
        let resp = check_response(resp).await?;
        let body = resp.text().await?;
        parse_uploaded(&body)
    }
}

fn parse_uploaded(body: &str) -> Result<UploadedAsset, UploadError> {
    let asset: UploadedAsset =
        serde_json::from_str(body).map_err(|e| UploadError::Malformed(e.to_string()))?;
    if asset.url.trim().is_empty() {
        return Err(UploadError::Malformed("response has an empty url".into()));
    }
    Ok(asset)
}
