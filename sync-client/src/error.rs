use std::error::Error as StdError;
use std::fmt;

/// Errors surfaced by the synchronization client. Fetch failures are held in
/// the affected kind's sync state for the caller to inspect and retry; they
/// never tear down the session.
#[derive(Debug)]
pub enum Error {
    /// A bulk fetch failed: network error, non-success HTTP status, or a
    /// response body without the expected data array.
    Fetch(String),
    /// The SSE transport could not be established.
    Transport(String),
    /// A response body could not be decoded as JSON.
    Decode(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fetch(message) => write!(f, "bulk fetch failed: {message}"),
            Error::Transport(message) => write!(f, "SSE transport failed: {message}"),
            Error::Decode(source) => write!(f, "failed to decode response: {source}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Decode(source) => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Decode(source)
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error::Fetch(source.to_string())
    }
}
