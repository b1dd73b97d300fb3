use serde::Deserialize;
use std::fmt;

/// Failure of a single call to the auth API.
///
/// Every variant carries text that is safe to show to a user; the HTTP helpers
/// never put request bodies, headers or tokens into these messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestError {
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, message: String },
    Parse(String),
    Serialization(String),
}

impl RequestError {
    /// Returns the message without the variant prefix used by `Display`.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            RequestError::Config(message)
            | RequestError::Network(message)
            | RequestError::Timeout(message)
            | RequestError::Parse(message)
            | RequestError::Serialization(message)
            | RequestError::Http { message, .. } => message,
        }
    }

    /// HTTP status for backend rejections, `None` for everything else.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Config(message) => write!(formatter, "Config error: {message}"),
            RequestError::Network(message) => write!(formatter, "Network error: {message}"),
            RequestError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            RequestError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            RequestError::Parse(message) => write!(formatter, "Response error: {message}"),
            RequestError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Error body returned by the auth API on non-2xx responses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
    pub field: Option<String>,
}
