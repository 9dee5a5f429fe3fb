use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// NOTE: Schema Design Goals
//
// 1. Normalization: Abstract the browser's devtools log quirks into two flat
//    variants the classifier can pattern-match on
//    - Response events carry the status/header surface needed for HTTP triage
//    - Loading failures keep the raw params blob for post-mortem inspection
//
// 2. Transience: Events are created fresh on every drain tick and dropped after
//    classification. Nothing downstream holds a reference past the tick, so the
//    types are plain owned data with no interning or arena tricks.

/// A single normalized entry drained from the browser's network-activity log.
///
/// Produced by the engine's envelope parser, consumed once by the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkEvent {
    /// The browser received a response for a request (any status)
    ResponseReceived {
        url: String,
        status: u16,

        /// Content-Type as reported by the response headers, if present
        #[serde(default)]
        mime_type: Option<String>,

        /// Full response header map
        #[serde(default)]
        headers: HashMap<String, String>,
    },

    /// A request never completed (aborted, DNS failure, connection reset, ...)
    LoadingFailed {
        url: String,

        /// Browser-reported error string, e.g. "net::ERR_ABORTED"
        error_text: String,

        /// Raw `params` object of the devtools entry, kept verbatim
        raw_params: Value,
    },
}

impl NetworkEvent {
    pub fn url(&self) -> &str {
        match self {
            NetworkEvent::ResponseReceived { url, .. } => url,
            NetworkEvent::LoadingFailed { url, .. } => url,
        }
    }
}
