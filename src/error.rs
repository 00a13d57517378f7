//! Error types for the Iris client

use thiserror::Error;

/// Result type alias for Iris operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Iris client
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection-level HTTP failure (DNS, connect, timeout)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code of the response
        status: reqwest::StatusCode,
        /// Response body text, if any
        body: String,
    },

    /// Response body was not the shape the wire contract promises
    #[error("decode error: {0}")]
    Decode(String),

    /// Backend executed the request but reported a failure
    #[error("backend error: {0}")]
    Backend(String),

    /// Operation invalid for the current session state
    #[error("sequence error: {0}")]
    Sequence(String),

    /// Audio format error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
