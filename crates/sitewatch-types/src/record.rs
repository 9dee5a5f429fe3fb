use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::util::file_name_from_url;

/// Classification tag attached to every persisted failure.
///
/// Serialized with the SCREAMING tags operators already grep for in the
/// error store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// API/XHR response with a failure status (>= threshold)
    #[serde(rename = "HTTP_ERROR")]
    HttpError,

    /// API/XHR request that never completed
    #[serde(rename = "LOADING_FAILED")]
    LoadingFailed,

    /// Media-segment response with a failure status
    #[serde(rename = "STREAM_ERROR")]
    StreamError,

    /// Media-segment request that never completed
    #[serde(rename = "STREAM_LOADING_FAILED")]
    StreamLoadingFailed,

    /// Uncaught failure of the monitor loop itself
    #[serde(rename = "MONITOR_ERROR")]
    MonitorError,
}

impl ErrorKind {
    pub fn as_tag(&self) -> &'static str {
        match self {
            ErrorKind::HttpError => "HTTP_ERROR",
            ErrorKind::LoadingFailed => "LOADING_FAILED",
            ErrorKind::StreamError => "STREAM_ERROR",
            ErrorKind::StreamLoadingFailed => "STREAM_LOADING_FAILED",
            ErrorKind::MonitorError => "MONITOR_ERROR",
        }
    }
}

/// The persisted unit of the whole pipeline.
///
/// Created by the classifier, owned transiently until handed to a sink.
/// Exactly one record is produced per classified event; the drain contract
/// (entries are never seen twice) makes persistence idempotent per event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// ISO-8601 capture time
    pub timestamp: DateTime<Utc>,

    /// Source URL, unmodified
    pub url: String,

    pub error_type: ErrorKind,

    /// HTTP status (response-family records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    /// Browser error string (loading-failed records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,

    /// Raw devtools params of the failing entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Last path segment of the URL, query stripped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Error class name (monitor-failure records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_class: Option<String>,

    /// Error message (monitor-failure records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ErrorRecord {
    /// Record for a response that came back with a failure status
    pub fn http_failure(
        timestamp: DateTime<Utc>,
        url: &str,
        status: u16,
        content_type: Option<String>,
        headers: HashMap<String, String>,
        kind: ErrorKind,
    ) -> Self {
        Self {
            timestamp,
            url: url.to_string(),
            error_type: kind,
            status: Some(status),
            content_type,
            headers: Some(headers),
            error_text: None,
            params: None,
            file_name: file_name_from_url(url),
            error_class: None,
            error_message: None,
        }
    }

    /// Record for a request that never completed
    pub fn loading_failure(
        timestamp: DateTime<Utc>,
        url: &str,
        error_text: &str,
        params: Value,
        kind: ErrorKind,
    ) -> Self {
        Self {
            timestamp,
            url: url.to_string(),
            error_type: kind,
            status: None,
            content_type: None,
            headers: None,
            error_text: Some(error_text.to_string()),
            params: Some(params),
            file_name: file_name_from_url(url),
            error_class: None,
            error_message: None,
        }
    }

    /// Record for an uncaught failure of the monitor loop itself
    pub fn monitor_failure(
        timestamp: DateTime<Utc>,
        url: &str,
        error_class: &str,
        error_message: &str,
    ) -> Self {
        Self {
            timestamp,
            url: url.to_string(),
            error_type: ErrorKind::MonitorError,
            status: None,
            content_type: None,
            headers: None,
            error_text: None,
            params: None,
            file_name: None,
            error_class: Some(error_class.to_string()),
            error_message: Some(error_message.to_string()),
        }
    }

    /// One-line operator summary for the textual logs
    pub fn summary(&self) -> String {
        match self.error_type {
            ErrorKind::HttpError | ErrorKind::StreamError => format!(
                "{}: {} - status {}",
                self.error_type.as_tag(),
                self.url,
                self.status.unwrap_or_default()
            ),
            ErrorKind::LoadingFailed | ErrorKind::StreamLoadingFailed => format!(
                "{}: {} - {}",
                self.error_type.as_tag(),
                self.url,
                self.error_text.as_deref().unwrap_or("unknown error")
            ),
            ErrorKind::MonitorError => format!(
                "{}: {} - {}",
                self.error_type.as_tag(),
                self.error_class.as_deref().unwrap_or("unknown"),
                self.error_message.as_deref().unwrap_or("")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_type_serializes_as_screaming_tag() {
        let record = ErrorRecord::http_failure(
            Utc::now(),
            "http://host/api/foo",
            500,
            Some("application/json".to_string()),
            HashMap::new(),
            ErrorKind::HttpError,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["error_type"], "HTTP_ERROR");
        assert_eq!(json["status"], 500);
        assert_eq!(json["file_name"], "foo");
    }

    #[test]
    fn test_loading_failure_keeps_url_unmodified() {
        let record = ErrorRecord::loading_failure(
            Utc::now(),
            "http://host/Media1/live/seg1.ts?token=abc",
            "net::ERR_ABORTED",
            serde_json::json!({"errorText": "net::ERR_ABORTED"}),
            ErrorKind::StreamLoadingFailed,
        );
        assert_eq!(record.url, "http://host/Media1/live/seg1.ts?token=abc");
        assert_eq!(record.file_name.as_deref(), Some("seg1.ts"));
        assert!(record.status.is_none());
    }

    #[test]
    fn test_monitor_failure_has_no_payload_fields() {
        let record =
            ErrorRecord::monitor_failure(Utc::now(), "http://host/page", "Session", "driver gone");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["error_type"], "MONITOR_ERROR");
        assert!(json.get("status").is_none());
        assert!(json.get("headers").is_none());
        assert_eq!(json["error_class"], "Session");
    }
}
