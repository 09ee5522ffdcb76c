//! Shared HTTP response check for the upload endpoint.

use crate::error::UploadError;

/// Return the response unchanged on 2xx, otherwise [`UploadError::Api`] with
/// the status code and response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, UploadError> {
    if !resp.status().is_success() {
        return Err(UploadError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}
