//! Quota / rate-limit classification of generation failures.
//!
//! Structured signals are checked first (HTTP 429, `error.status` of
//! `RESOURCE_EXHAUSTED`). Messages are then scanned for the same markers
//! because transport-level failures carry no structured body. Transport
//! errors are scanned through their source chain only, never the request
//! URL, so a host, port or model name cannot look like a quota signal.

use std::error::Error as _;

use crate::api::ImageGenError;

/// Upstream status name for an exhausted quota.
pub const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// HTTP status for rate-limited / over-quota requests.
pub const HTTP_TOO_MANY_REQUESTS: u16 = 429;

/// Whether `err` means the caller is out of quota and must stop calling.
pub fn is_quota_exhausted(err: &ImageGenError) -> bool {
    match err {
        ImageGenError::Api {
            status,
            message,
            reason,
        } => {
            *status == HTTP_TOO_MANY_REQUESTS
                || reason.as_deref() == Some(RESOURCE_EXHAUSTED)
                || message_has_quota_marker(message)
        }
        ImageGenError::Request(e) => {
            e.status().map(|s| s.as_u16()) == Some(HTTP_TOO_MANY_REQUESTS)
                || message_has_quota_marker(&transport_message(e))
        }
    }
}

/// Causes of a transport error, without the `for url (...)` suffix that
/// reqwest's own `Display` appends.
fn transport_message(err: &reqwest::Error) -> String {
    let mut parts = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

/// Substring markers: `429`, `quota` (any case), `RESOURCE_EXHAUSTED`.
pub fn message_has_quota_marker(message: &str) -> bool {
    message.contains("429")
        || message.contains(RESOURCE_EXHAUSTED)
        || message.to_ascii_lowercase().contains("quota")
}
