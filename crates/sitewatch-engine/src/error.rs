use std::fmt;

/// Result type for sitewatch-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the engine layer
#[derive(Debug)]
pub enum Error {
    /// A drained entry was not a well-formed log envelope. Always non-fatal:
    /// the classifier counts these and drops them.
    Envelope(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Envelope(msg) => write!(f, "Malformed log envelope: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Envelope(err.to_string())
    }
}
