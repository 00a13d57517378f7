//! Configuration for the Iris client

use std::time::Duration;

use url::Url;

use crate::{Error, Result};

/// Default backend base URL (local inference server)
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:4000";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Iris client configuration
///
/// Immutable after construction; the backend endpoint is fixed for the
/// lifetime of a session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the inference backend
    pub server: Url,

    /// Per-request timeout applied to every backend call
    pub timeout: Duration,
}

impl Config {
    /// Create a configuration from a base URL and timeout
    ///
    /// # Errors
    ///
    /// Returns error if the URL does not parse or is not http(s)
    pub fn new(server: &str, timeout: Duration) -> Result<Self> {
        let server = Url::parse(server)
            .map_err(|e| Error::Config(format!("invalid server URL {server:?}: {e}")))?;

        if !matches!(server.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "unsupported server URL scheme: {}",
                server.scheme()
            )));
        }

        Ok(Self { server, timeout })
    }
}
