//! Error types for Tinder API calls

use serde_json::Value;

/// Errors from session operations.
///
/// Nothing here is retried or logged by the library; every variant is
/// handed straight back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No response was received (connect failure, timeout, broken body stream)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not valid JSON. Reported regardless of HTTP status.
    #[error("unable to parse body: {0}")]
    Parse(#[source] serde_json::Error),

    /// The body parsed but the status was not 200. The service puts its
    /// error detail in the body, so it is kept verbatim.
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: Value },

    /// Local precondition failure; no request was sent
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias for Tinder API operations.
pub type Result<T> = std::result::Result<T, Error>;
