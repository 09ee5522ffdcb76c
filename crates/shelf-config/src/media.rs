//! Media upload limits and endpoint settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_max_slots() -> usize {
    4
}

const fn default_max_file_mb() -> u64 {
    20
}

const fn default_upload_timeout_secs() -> u64 {
    20
}

fn default_upload_path() -> String {
    String::from("/api/upload/public")
}

fn default_asset_category() -> String {
    String::from("products")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Maximum number of images an item can carry.
    #[serde(default = "default_max_slots")]
    pub max_slots: usize,

    /// Per-file size ceiling in MiB.
    #[serde(default = "default_max_file_mb")]
    pub max_file_mb: u64,

    /// Upper bound on one primary upload before falling back to inline encoding.
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,

    /// Upload endpoint path, joined onto `api.base_url`.
    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    /// Storage folder sent with each upload.
    #[serde(default = "default_asset_category")]
    pub asset_category: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_slots: default_max_slots(),
            max_file_mb: default_max_file_mb(),
            upload_timeout_secs: default_upload_timeout_secs(),
            upload_path: default_upload_path(),
            asset_category: default_asset_category(),
        }
    }
}

impl MediaConfig {
    #[must_use]
    pub const fn max_file_bytes(&self) -> u64 {
        self.max_file_mb * 1024 * 1024
    }

    #[must_use]
    pub const fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}
