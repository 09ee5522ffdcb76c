//! Local fallback: embed file bytes as a data URI.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::source::SourceFile;

/// Encode `file` as `data:{mime};base64,{payload}`. Cannot fail.
#[must_use]
pub fn data_uri(file: &SourceFile) -> String {
    let mime = if file.content_type.trim().is_empty() {
        "application/octet-stream"
    } else {
        file.content_type.as_str()
    };
    format!("data:{mime};base64,{}", STANDARD.encode(&file.bytes))
}
