//! Payloads exchanged with the classification backend

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::UserId;

/// Body of `POST /api/register` and `POST /api/login`
#[derive(Serialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful register/login response
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AuthResponse {
    pub message: String,
    pub user_id: UserId,
}

/// One past prediction, as listed by `GET /api/history`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub class_name: String,
    pub confidence: f64,
    pub created_at: String,
}

/// Classification of one submitted image
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub class_name: String,
    /// Model confidence in 0..1
    pub confidence: f64,
    pub prediction_id: i64,
    pub created_at: String,
}

/// Liveness response of `GET /`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceStatus {
    pub message: String,
}

/// Parse a server timestamp.
///
/// Accepts RFC 3339 and the naive ISO-8601 form the backend emits
/// (`2024-01-01T10:30:00.123456`), which is UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Local-time rendering of a server timestamp; unparsable values are shown as-is
pub fn display_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => raw.to_string(),
    }
}

/// Confidence as a percentage with two decimals, e.g. `87.00%`
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.87), "87.00%");
        assert_eq!(format_confidence(1.0), "100.00%");
        assert_eq!(format_confidence(0.0), "0.00%");
        assert_eq!(format_confidence(0.123456), "12.35%");
    }

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(
            (ts.year(), ts.month(), ts.day(), ts.hour()),
            (2024, 1, 1, 0)
        );

        let offset = parse_timestamp("2024-01-01T03:00:00+03:00").unwrap();
        assert_eq!(offset, ts);
    }

    #[test]
    fn test_parse_naive_isoformat() {
        let ts = parse_timestamp("2024-05-06T07:08:09.123456").unwrap();
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (7, 8, 9));

        assert!(parse_timestamp("2024-05-06T07:08:09").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_display_timestamp_keeps_garbage() {
        assert_eq!(display_timestamp("not a date"), "not a date");
        let shown = display_timestamp("2024-01-01T00:00:00Z");
        assert_ne!(shown, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_backend_records_decode() {
        let record: PredictionRecord = serde_json::from_str(
            r#"{"class_name":"Blight","confidence":0.87,"prediction_id":3,
                "created_at":"2024-01-01T00:00:00","model":"v2"}"#,
        )
        .unwrap();
        assert_eq!(record.class_name, "Blight");
        assert_eq!(record.prediction_id, 3);

        let entry: HistoryEntry = serde_json::from_str(
            r#"{"id":3,"class_name":"Blight","confidence":0.87,
                "created_at":"2024-01-01T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(entry.id, record.prediction_id);
        assert_eq!(entry.confidence, record.confidence);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials {
            email: "a@b.com".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("hunter2"));
    }
}
