use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal result of one authentication attempt.
///
/// Computed once per attempt and not retained beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A 2xx on the login endpoint was observed, or the session landed on
    /// the post-login location
    Success,

    /// The deadline elapsed with neither signal
    Failure,
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success)
    }
}

/// Process-wide lifecycle of the single browser session.
///
/// Exactly one live session per process; every path out of the monitor loop
/// ends in `Terminated` with the session released exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unstarted,
    Authenticating,
    Navigating,
    Monitoring,
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Unstarted => "unstarted",
            SessionState::Authenticating => "authenticating",
            SessionState::Navigating => "navigating",
            SessionState::Monitoring => "monitoring",
            SessionState::Terminated => "terminated",
        };
        write!(f, "{}", label)
    }
}
