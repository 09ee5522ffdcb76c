//! Cross-cutting error types for Shelf.
//!
//! Component-specific errors (`DraftError`, `UploadError`, `TaxonomyError`,
//! `WizardError`) live in their own crates. `CoreError` covers the failures
//! that can be raised while building core values.

use thiserror::Error;

/// Errors raised while constructing or converting core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (plan shape, missing resolved ids).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A taxonomy term was still pending where a resolved id is required.
    #[error("{kind} '{name}' has not been created yet")]
    UnresolvedTerm { kind: String, name: String },

    /// JSON (de)serialization of a core value failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
