//! Shared HTTP helpers for the taxonomy client.

use crate::error::TaxonomyError;

/// Check an HTTP response for success; return [`TaxonomyError::Api`] with the
/// body otherwise.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TaxonomyError> {
    if !resp.status().is_success() {
        return Err(TaxonomyError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}
