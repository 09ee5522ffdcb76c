//! Master-list lookup service.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use shelf_config::ShelfConfig;
use shelf_core::{MasterEntry, TaxonomyKind};

use crate::error::TaxonomyError;
use crate::http::check_response;

const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));

/// Lists master entries and creates custom ones.
pub trait TaxonomyLookup: Send + Sync {
    /// Every entry of `kind` visible to the tenant.
    fn list(
        &self,
        kind: TaxonomyKind,
    ) -> impl Future<Output = Result<Vec<MasterEntry>, TaxonomyError>> + Send;

    /// Create a custom entry. `parent` is the owning category id for
    /// subcategories and brands.
    fn create(
        &self,
        kind: TaxonomyKind,
        name: &str,
        parent: Option<&str>,
    ) -> impl Future<Output = Result<MasterEntry, TaxonomyError>> + Send;
}

/// REST path segment for a taxonomy kind.
#[must_use]
pub const fn collection(kind: TaxonomyKind) -> &'static str {
    match kind {
        TaxonomyKind::Category => "categories",
        TaxonomyKind::Subcategory => "subcategories",
        TaxonomyKind::Brand => "brands",
        TaxonomyKind::Unit => "units",
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor_id: Option<&'a str>,
}

/// `GET/POST {base}/api/{collection}` client, scoped to one tenant.
#[derive(Debug, Clone)]
pub struct HttpTaxonomyClient {
    http: reqwest::Client,
    base_url: String,
    scope: Option<String>,
}

impl HttpTaxonomyClient {
    /// # Errors
    ///
    /// Returns [`TaxonomyError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        scope: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TaxonomyError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            scope: scope.filter(|s| !s.is_empty()),
        })
    }

    /// # Errors
    ///
    /// Returns [`TaxonomyError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &ShelfConfig) -> Result<Self, TaxonomyError> {
        Self::new(
            config.api.base_url.clone(),
            Some(config.tenant.scope.clone()),
            config.api.timeout(),
        )
    }

    /// URL of the list endpoint, with the tenant scope as `vendorId`.
    #[must_use]
    pub fn list_url(&self, kind: TaxonomyKind) -> String {
        let base = format!("{}/api/{}", self.base_url, collection(kind));
        match &self.scope {
            Some(scope) => format!("{base}?vendorId={}", urlencoding::encode(scope)),
            None => base,
        }
    }
}

impl TaxonomyLookup for HttpTaxonomyClient {
    async fn list(&self, kind: TaxonomyKind) -> Result<Vec<MasterEntry>, TaxonomyError> {
        let resp = check_response(self.http.get(self.list_url(kind)).send().await?).await?;
        parse_entries(&resp.text().await?)
    }

    async fn create(
        &self,
        kind: TaxonomyKind,
        name: &str,
        parent: Option<&str>,
    ) -> Result<MasterEntry, TaxonomyError> {
        let url = format!("{}/api/{}", self.base_url, collection(kind));
        let body = CreateBody {
            name,
            category_id: parent.filter(|_| kind.has_parent()),
            vendor_id: self.scope.as_deref(),
        };
        let resp = check_response(self.http.post(&url).json(&body).send().await?).await?;
        let entry = parse_created(&resp.text().await?)?;
        if entry.id.trim().is_empty() {
            return Err(TaxonomyError::Create {
                kind,
                name: name.to_string(),
                reason: "service returned an empty id".into(),
            });
        }
        Ok(entry)
    }
}

fn parse_entries(body: &str) -> Result<Vec<MasterEntry>, TaxonomyError> {
    serde_json::from_str(body).map_err(|e| TaxonomyError::Parse(e.to_string()))
}

fn parse_created(body: &str) -> Result<MasterEntry, TaxonomyError> {
    serde_json::from_str(body).map_err(|e| TaxonomyError::Parse(e.to_string()))
}
