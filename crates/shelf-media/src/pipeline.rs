//! Sequential upload of a batch of files into a form's asset list.
//!
//! Per file, in selection order:
//!
//! ```text
//! no slot left ─────────► Rejection(SlotsExhausted)
//! empty / over ceiling ─► Rejection(Empty | TooLarge)
//! primary upload ok ────► Uploaded { url, key }
//! primary upload fails ─► InlineEncoded { data URI }   (logged, not an error)
//! ```
//!
//! Each accepted result is pushed onto the caller's list as soon as it
//! resolves, so dropping the batch future midway keeps what already landed.

use std::fmt;
use std::time::Duration;

use shelf_config::MediaConfig;
use shelf_core::AssetUploadResult;

use crate::error::UploadError;
use crate::inline;
use crate::source::SourceFile;
use crate::uploader::{AssetUploader, UploadScope};

/// Slot and size ceilings for the asset list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaLimits {
    pub max_slots: usize,
    pub max_file_bytes: u64,
}

impl MediaLimits {
    #[must_use]
    pub const fn from_config(config: &MediaConfig) -> Self {
        Self {
            max_slots: config.max_slots,
            max_file_bytes: config.max_file_bytes(),
        }
    }
}

impl Default for MediaLimits {
    fn default() -> Self {
        Self::from_config(&MediaConfig::default())
    }
}

/// Why a file was not attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    SlotsExhausted { max: usize },
    TooLarge { size: u64, max: u64 },
    Empty,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotsExhausted { max } => write!(f, "you can upload up to {max} images"),
            Self::TooLarge { size, max } => write!(
                f,
                "file is {:.1} MB, the limit is {} MB",
                mb(*size),
                max / MIB
            ),
            Self::Empty => f.write_str("file is empty"),
        }
    }
}

const MIB: u64 = 1024 * 1024;

#[allow(clippy::cast_precision_loss)]
fn mb(bytes: u64) -> f64 {
    bytes as f64 / MIB as f64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub file: String,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.reason)
    }
}

/// What happened to one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Results appended to the asset list, in order.
    pub accepted: Vec<AssetUploadResult>,
    pub rejected: Vec<Rejection>,
}

impl BatchReport {
    /// How many accepted files went the inline route.
    #[must_use]
    pub fn inline_count(&self) -> usize {
        self.accepted.iter().filter(|a| a.is_inline()).count()
    }
}

/// Uploads files one at a time, falling back to inline encoding.
#[derive(Debug, Clone)]
pub struct MediaUploadPipeline<U> {
    uploader: U,
    limits: MediaLimits,
    timeout: Duration,
}

impl<U: AssetUploader> MediaUploadPipeline<U> {
    #[must_use]
    pub fn new(uploader: U, limits: MediaLimits, timeout: Duration) -> Self {
        Self {
            uploader,
            limits,
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(uploader: U, config: &MediaConfig) -> Self {
        Self::new(
            uploader,
            MediaLimits::from_config(config),
            config.upload_timeout(),
        )
    }

    #[must_use]
    pub const fn uploader(&self) -> &U {
        &self.uploader
    }

    #[must_use]
    pub const fn limits(&self) -> MediaLimits {
        self.limits
    }

    /// Process `files` in order, appending accepted results to `assets`.
    ///
    /// Never fails: upload errors degrade to inline encoding and invalid
    /// files are reported in [`BatchReport::rejected`].
    pub async fn upload_batch(
        &self,
        assets: &mut Vec<AssetUploadResult>,
        files: Vec<SourceFile>,
        scope: &UploadScope,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for file in files {
            if let Some(reason) = self.check(assets.len(), &file) {
                tracing::debug!(file = %file.name, %reason, "file rejected");
                report.rejected.push(Rejection {
                    file: file.name,
                    reason,
                });
                continue;
            }

            let result = self.process(file, scope).await;
            assets.push(result.clone());
            report.accepted.push(result);
        }

        report
    }

    fn check(&self, used: usize, file: &SourceFile) -> Option<RejectReason> {
        if used >= self.limits.max_slots {
            return Some(RejectReason::SlotsExhausted {
                max: self.limits.max_slots,
            });
        }
        if file.is_empty() {
            return Some(RejectReason::Empty);
        }
        if file.len() > self.limits.max_file_bytes {
            return Some(RejectReason::TooLarge {
                size: file.len(),
                max: self.limits.max_file_bytes,
            });
        }
        None
    }

    async fn process(&self, file: SourceFile, scope: &UploadScope) -> AssetUploadResult {
        let outcome = tokio::time::timeout(self.timeout, self.uploader.upload(&file, scope))
            .await
            .unwrap_or_else(|_| Err(UploadError::TimedOut(self.timeout)));

        match outcome {
            Ok(uploaded) => {
                tracing::debug!(file = %file.name, url = %uploaded.url, "asset uploaded");
                AssetUploadResult::uploaded(file.name, uploaded.url, uploaded.key)
            }
            Err(error) => {
                tracing::warn!(file = %file.name, %error, "primary upload failed; encoding inline");
                let payload = inline::data_uri(&file);
                AssetUploadResult::inline(file.name, payload)
            }
        }
    }
}
