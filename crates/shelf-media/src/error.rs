//! Upload error types.

use thiserror::Error;

/// Failures of the primary upload path.
///
/// The pipeline never surfaces these to the user: any of them triggers the
/// inline-encoding fallback. They exist for logging and for uploader tests.
#[derive(Debug, Error)]
pub enum UploadError {
    /// HTTP transport error (connect, TLS, client-side timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upload endpoint returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The endpoint answered 2xx but the body was not usable.
    #[error("malformed upload response: {0}")]
    Malformed(String),

    /// The upload did not finish within the configured bound.
    #[error("upload timed out after {0:?}")]
    TimedOut(std::time::Duration),

    /// Reading a source file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
