use std::fmt;

/// Result type for sitewatch-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer.
///
/// Parse and classification failures never appear here: the engine swallows
/// them per entry and only ever reports a drop count.
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// The login deadline elapsed with neither success signal
    AuthenticationTimeout,

    /// The login endpoint answered with a non-2xx status
    AuthenticationRejected(String),

    /// The target page did not become ready within the timeout
    NavigationTimeout(String),

    /// A record could not be persisted (non-fatal to the loop)
    Persistence(String),

    /// The browser session itself is gone or unusable (fatal)
    Session(String),
}

impl Error {
    /// Short class name used in MONITOR_ERROR records
    pub fn class_name(&self) -> &'static str {
        match self {
            Error::Io(_) => "Io",
            Error::Config(_) => "Config",
            Error::AuthenticationTimeout => "AuthenticationTimeout",
            Error::AuthenticationRejected(_) => "AuthenticationRejected",
            Error::NavigationTimeout(_) => "NavigationTimeout",
            Error::Persistence(_) => "Persistence",
            Error::Session(_) => "Session",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::AuthenticationTimeout => write!(f, "Login timed out without a success signal"),
            Error::AuthenticationRejected(msg) => write!(f, "Login rejected: {}", msg),
            Error::NavigationTimeout(url) => {
                write!(f, "Navigation to {} timed out before the page was ready", url)
            }
            Error::Persistence(msg) => write!(f, "Persistence error: {}", msg),
            Error::Session(msg) => write!(f, "Session error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Session(err.to_string())
    }
}
