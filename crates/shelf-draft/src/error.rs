//! Draft storage error types.

/// Errors raised by a [`DraftStorage`](crate::DraftStorage) backend.
///
/// `DraftStore` never surfaces these to its caller; they are logged and the
/// autosave degrades silently.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// Filesystem operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored draft could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend-specific failure (quota, unavailable store).
    #[error("storage error: {0}")]
    Storage(String),
}
