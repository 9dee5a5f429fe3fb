/// Derive the short name of a URL: the last path segment with any query or
/// fragment stripped. Returns None when the path has no segment (bare host,
/// trailing slash).
pub fn file_name_from_url(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);

    // Drop the scheme so a bare host is not mistaken for a path segment
    let rest = without_query
        .split_once("://")
        .map(|(_, r)| r)
        .unwrap_or(without_query);

    let (_, segment) = rest.rsplit_once('/')?;
    if segment.is_empty() {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_segment() {
        assert_eq!(
            file_name_from_url("http://host/Media1/live/seg1.ts"),
            Some("seg1.ts".to_string())
        );
    }

    #[test]
    fn test_query_and_fragment_stripped() {
        assert_eq!(
            file_name_from_url("http://host/live/seg1.ts?token=abc#t=5"),
            Some("seg1.ts".to_string())
        );
    }

    #[test]
    fn test_trailing_slash_has_no_name() {
        assert_eq!(file_name_from_url("http://host/api/"), None);
    }

    #[test]
    fn test_bare_host_has_no_name() {
        assert_eq!(file_name_from_url("http://host"), None);
    }
}
