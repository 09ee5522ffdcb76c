//! Taxonomy error types.

use shelf_core::TaxonomyKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Lookup service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a lookup response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Creating a custom term was refused or returned nothing usable.
    #[error("could not create {kind} '{name}': {reason}")]
    Create {
        kind: TaxonomyKind,
        name: String,
        reason: String,
    },
}
