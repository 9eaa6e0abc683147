//! Backend REST API
//!
//! Every call performs exactly one request and yields an [`ApiResult`].
//! Failures of any kind (transport, HTTP status, malformed body) collapse
//! into an [`ApiError`] carrying one human-readable message.

pub mod client;
pub mod types;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub use client::ApiClient;
pub use types::{AuthResponse, Credentials, HistoryEntry, PredictionRecord};

/// Message used when the server gives no usable error text
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// A failed API call, reduced to the message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
        }
    }

    /// Error carrying the generic failure text
    pub fn fallback() -> Self {
        Self::new(FALLBACK_MESSAGE)
    }

    /// Transport-level failure (connection refused, DNS, broken body stream)
    pub fn network(err: &reqwest::Error) -> Self {
        Self::new(format!("Network error: {}", err))
    }
}

/// Result of one API call
pub type ApiResult<T> = Result<T, ApiError>;

/// Turn a raw HTTP response into a typed result.
///
/// The body is parsed as JSON, defaulting to `{}` when it is not JSON.
/// A non-success status yields the body's `error` string if present and
/// non-empty, else the fallback text. A success body that does not have
/// the expected shape also yields the fallback text.
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> ApiResult<T> {
    let data: Value = serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::Object(Default::default()));

    if !status.is_success() {
        let message = data
            .get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty());
        return Err(message.map(ApiError::new).unwrap_or_else(ApiError::fallback));
    }

    serde_json::from_value(data).map_err(|e| {
        warn!("⚠️  Unexpected response shape ({}): {}", status, e);
        ApiError::fallback()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_decodes() {
        let auth: AuthResponse =
            decode(StatusCode::OK, br#"{"message":"ok","user_id":42}"#).unwrap();
        assert_eq!(auth.message, "ok");
        assert_eq!(auth.user_id.0, 42);
    }

    #[test]
    fn test_server_error_field_is_surfaced() {
        let err = decode::<PredictionRecord>(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"error":"model unavailable"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "model unavailable");
    }

    #[test]
    fn test_non_ok_without_error_field_uses_fallback() {
        let cases: [&[u8]; 5] = [
            br#"{"message":"nope"}"#,
            br#"{"error":""}"#,
            br#"{"error":{"code":7}}"#,
            b"<html>502 Bad Gateway</html>",
            b"",
        ];
        for body in cases {
            let err = decode::<AuthResponse>(StatusCode::BAD_GATEWAY, body).unwrap_err();
            assert_eq!(err.to_string(), FALLBACK_MESSAGE);
        }
    }

    #[test]
    fn test_ok_with_unparsable_body_never_panics() {
        let err = decode::<Vec<HistoryEntry>>(StatusCode::OK, b"not json").unwrap_err();
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);

        let err = decode::<AuthResponse>(StatusCode::OK, br#"{"message":"ok"}"#).unwrap_err();
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_history_list_decodes_in_server_order() {
        let body = br#"[
            {"id":2,"class_name":"Rust","confidence":0.5,"created_at":"2024-01-02T00:00:00"},
            {"id":1,"class_name":"Blight","confidence":0.87,"created_at":"2024-01-01T00:00:00Z"}
        ]"#;
        let entries: Vec<HistoryEntry> = decode(StatusCode::OK, body).unwrap();
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
