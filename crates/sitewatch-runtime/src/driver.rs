use crate::Result;

/// Capability surface of the live browser session.
///
/// The monitor owns exactly one driver for its whole lifetime and releases it
/// exactly once. Everything the pipeline needs from the browser goes through
/// this seam, which keeps the state machine testable against a scripted fake.
pub trait SessionDriver {
    /// Issue navigation to a URL. Does not wait for readiness; that is the
    /// navigation gate's job.
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Current URL of the session.
    fn current_location(&mut self) -> Result<String>;

    /// Destructive read of the network-activity log. Each call returns only
    /// entries accumulated since the previous call; no entry is ever seen
    /// twice.
    fn drain_network_log(&mut self) -> Result<Vec<String>>;

    /// Minimal page-readiness predicate: the document root exists.
    fn document_ready(&mut self) -> Result<bool>;

    /// Fill and submit the login form. Credentials are opaque strings.
    fn submit_credentials(&mut self, account: &str, password: &str) -> Result<()>;

    /// Release the session. Must be idempotent.
    fn close(&mut self) -> Result<()>;
}
