//! Tenant scope settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TenantConfig {
    /// Vendor/tenant id used for draft keys, uploads and API paths.
    #[serde(default)]
    pub scope: String,

    /// Category ids this tenant has pre-selected. Empty offers the full list.
    #[serde(default)]
    pub allowed_categories: Vec<String>,
}

impl TenantConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.scope.is_empty()
    }
}
