use serde::{Deserialize, Serialize};

use crate::record::ErrorKind;

fn default_min_status() -> u16 {
    400
}

/// URL-pattern rule the classifier matches drained events against.
///
/// A rule carries one or more URL fragments (ALL must be present as
/// substrings), the minimum status worth reporting for response-family
/// events, and the category pair it emits. Rules are built once at startup
/// from config and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRule {
    /// Substring fragments, logical AND
    pub fragments: Vec<String>,

    /// Responses below this status are observed but never reported
    #[serde(default = "default_min_status")]
    pub min_status: u16,

    /// Category for matching response-received events
    pub response_category: ErrorKind,

    /// Category for matching loading-failed events
    pub failure_category: ErrorKind,
}

impl MatchRule {
    /// Generic API/XHR rule: a single path fragment, e.g. "/api/"
    pub fn api(fragment: &str) -> Self {
        Self {
            fragments: vec![fragment.to_string()],
            min_status: default_min_status(),
            response_category: ErrorKind::HttpError,
            failure_category: ErrorKind::LoadingFailed,
        }
    }

    /// Stream-segment rule: a path marker plus a file-extension marker,
    /// e.g. ("/live/", ".ts"). Both must be present for a match.
    pub fn stream(path_fragment: &str, extension: &str) -> Self {
        Self {
            fragments: vec![path_fragment.to_string(), extension.to_string()],
            min_status: default_min_status(),
            response_category: ErrorKind::StreamError,
            failure_category: ErrorKind::StreamLoadingFailed,
        }
    }

    /// True when every fragment appears in the URL
    pub fn matches(&self, url: &str) -> bool {
        !self.fragments.is_empty() && self.fragments.iter().all(|f| url.contains(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_rule_single_fragment() {
        let rule = MatchRule::api("/api/");
        assert!(rule.matches("http://host/api/user/login"));
        assert!(!rule.matches("http://host/assets/app.js"));
        assert_eq!(rule.min_status, 400);
        assert_eq!(rule.response_category, ErrorKind::HttpError);
    }

    #[test]
    fn test_stream_rule_requires_both_fragments() {
        let rule = MatchRule::stream("/live/", ".ts");
        assert!(rule.matches("http://host/Media1/live/seg1.ts"));
        assert!(!rule.matches("http://host/Media1/live/playlist.m3u8"));
        assert!(!rule.matches("http://host/vod/seg1.ts"));
    }

    #[test]
    fn test_empty_fragment_list_never_matches() {
        let rule = MatchRule {
            fragments: vec![],
            min_status: 400,
            response_category: ErrorKind::HttpError,
            failure_category: ErrorKind::LoadingFailed,
        };
        assert!(!rule.matches("http://host/api/foo"));
    }
}
