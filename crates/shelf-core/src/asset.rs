//! Per-file media outcomes.

use serde::{Deserialize, Serialize};

/// Data URI prefix used by inline-encoded assets.
pub const DATA_URI_PREFIX: &str = "data:";

/// How a single source file ended up in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssetOutcome {
    /// Stored by the remote asset endpoint.
    Uploaded {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },
    /// Primary upload failed; the bytes travel inline as a data URI.
    InlineEncoded { payload: String },
}

/// The result of processing one user-selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUploadResult {
    /// Name of the source file (or the original URL for pre-existing assets).
    pub source: String,
    #[serde(flatten)]
    pub outcome: AssetOutcome,
}

impl AssetUploadResult {
    #[must_use]
    pub fn uploaded(source: impl Into<String>, url: impl Into<String>, key: Option<String>) -> Self {
        Self {
            source: source.into(),
            outcome: AssetOutcome::Uploaded {
                url: url.into(),
                key,
            },
        }
    }

    #[must_use]
    pub fn inline(source: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            outcome: AssetOutcome::InlineEncoded {
                payload: payload.into(),
            },
        }
    }

    /// Rebuild a result from an image reference stored on an existing entity.
    #[must_use]
    pub fn from_existing(reference: &str, key: Option<String>) -> Self {
        if reference.starts_with(DATA_URI_PREFIX) {
            Self::inline(reference, reference)
        } else {
            Self::uploaded(reference, reference, key)
        }
    }

    /// The value downstream consumers render: a URL or a data URI.
    #[must_use]
    pub fn src(&self) -> &str {
        match &self.outcome {
            AssetOutcome::Uploaded { url, .. } => url,
            AssetOutcome::InlineEncoded { payload } => payload,
        }
    }

    /// Storage key of an uploaded asset.
    #[must_use]
    pub fn storage_key(&self) -> Option<&str> {
        match &self.outcome {
            AssetOutcome::Uploaded { key, .. } => key.as_deref(),
            AssetOutcome::InlineEncoded { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_inline(&self) -> bool {
        matches!(self.outcome, AssetOutcome::InlineEncoded { .. })
    }
}
