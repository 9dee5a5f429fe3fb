//! End-to-end classifier scenarios over realistic double-encoded log entries,
//! in the shape the browser's log transport actually delivers them.

use chrono::Utc;
use sitewatch_engine::Classifier;
use sitewatch_types::{ErrorKind, MatchRule};

fn entry(method: &str, params: serde_json::Value) -> String {
    let inner = serde_json::json!({"message": {"method": method, "params": params}});
    serde_json::json!({
        "level": "INFO",
        "timestamp": 1_700_000_000_000_i64,
        "message": inner.to_string(),
    })
    .to_string()
}

fn response_entry(url: &str, status: u16) -> String {
    entry(
        "Network.responseReceived",
        serde_json::json!({
            "requestId": "7",
            "response": {
                "url": url,
                "status": status,
                "mimeType": "application/json",
                "headers": {"content-type": "application/json", "server": "nginx"}
            }
        }),
    )
}

#[test]
fn api_failure_produces_exactly_one_http_error_record() {
    let classifier = Classifier::new(vec![MatchRule::api("/api/"), MatchRule::api("/xhr/")]);

    let batch = [
        response_entry("http://localhost:4200/api/user/profile", 200),
        response_entry("http://localhost:4200/api/foo", 500),
        response_entry("http://localhost:4200/assets/logo.png", 404),
    ];
    let report = classifier.drain_tick(&batch, Utc::now());

    assert_eq!(report.dropped, 0);
    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.error_type, ErrorKind::HttpError);
    assert_eq!(record.status, Some(500));
    assert_eq!(record.url, "http://localhost:4200/api/foo");
    assert_eq!(record.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        record.headers.as_ref().and_then(|h| h.get("server")).map(String::as_str),
        Some("nginx")
    );
}

#[test]
fn aborted_stream_segment_produces_stream_loading_failed_record() {
    let classifier = Classifier::new(vec![MatchRule::stream("/live/", ".ts")]);

    let batch = [entry(
        "Network.loadingFailed",
        serde_json::json!({
            "requestId": "9",
            "url": "http://localhost:4200/Media1/live/seg1.ts",
            "errorText": "net::ERR_ABORTED",
            "canceled": true
        }),
    )];
    let report = classifier.drain_tick(&batch, Utc::now());

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.error_type, ErrorKind::StreamLoadingFailed);
    assert_eq!(record.file_name.as_deref(), Some("seg1.ts"));
    assert_eq!(record.url, "http://localhost:4200/Media1/live/seg1.ts");
    assert_eq!(record.error_text.as_deref(), Some("net::ERR_ABORTED"));
    assert!(record.params.is_some());
}

#[test]
fn playlist_without_segment_extension_is_not_a_stream_match() {
    let classifier = Classifier::new(vec![MatchRule::stream("/live/", ".ts")]);

    let batch = [response_entry("http://localhost:4200/Media1/live/playlist.m3u8", 500)];
    let report = classifier.drain_tick(&batch, Utc::now());

    assert!(report.records.is_empty());
    assert_eq!(report.parsed, 1);
}

#[test]
fn invalid_envelopes_never_raise_and_never_emit() {
    let classifier = Classifier::new(vec![MatchRule::api("/api/")]);

    let batch = [
        "".to_string(),
        "null".to_string(),
        r#"{"message": 42}"#.to_string(),
        serde_json::json!({"message": "{\"no_message_key\": true}"}).to_string(),
    ];
    let report = classifier.drain_tick(&batch, Utc::now());

    assert!(report.records.is_empty());
    assert_eq!(report.parsed, 0);
    assert_eq!(report.dropped, batch.len());
}
