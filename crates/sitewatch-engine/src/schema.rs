//! Raw shapes of the browser's performance log.
//!
//! Each drained entry is a JSON object whose `message` field is itself a JSON
//! string wrapping `{"message": {"method": ..., "params": ...}}`. The double
//! encoding is a property of the log transport, not of our data model, and is
//! unwrapped entirely inside this crate.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Outer entry as returned by the session's log drain
#[derive(Debug, Deserialize)]
pub(crate) struct LogEntry {
    /// JSON-encoded devtools envelope
    pub message: String,
}

/// The decoded `message` string
#[derive(Debug, Deserialize)]
pub(crate) struct DevtoolsEnvelope {
    pub message: DevtoolsMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevtoolsMessage {
    pub method: String,

    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseParams {
    pub response: ResponseBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResponseBody {
    pub url: String,
    pub status: u16,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub headers: HashMap<String, String>,
}
