//! # shelf-media
//!
//! Attaches user-selected images to a form. Each file is uploaded to the
//! remote asset endpoint; when that fails for any reason the bytes are
//! embedded as a data URI instead, so the user is never blocked by storage
//! being down. Slot and size limits reject files up front.

pub mod error;
mod http;
pub mod inline;
pub mod pipeline;
pub mod source;
pub mod uploader;

pub use error::UploadError;
pub use pipeline::{BatchReport, MediaLimits, MediaUploadPipeline, RejectReason, Rejection};
pub use source::SourceFile;
pub use uploader::{AssetUploader, HttpAssetUploader, UploadScope, UploadedAsset};
