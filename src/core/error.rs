use std::time::Duration;

use thiserror::Error;

use crate::core::retry::RetryConfig;

/// The primary error type for all fallible operations in this crate.
///
/// Data-quality problems in a payload are never reported through this type; they surface as
/// [`ValidationError`](crate::core::ValidationError) entries inside a validation result.
#[derive(Debug, Error)]
pub enum EsgError {
    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The data received from a source was in an unexpected format.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// No fetch route is configured for the given source.
    #[error("Unknown or unsupported source: {0}")]
    UnsupportedSource(String),

    /// Fetching a payload did not complete within the configured timeout.
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    /// The persistence layer rejected a read or write.
    #[error("store error: {0}")]
    Store(String),

    /// The caller supplied invalid parameters.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

impl EsgError {
    /// Whether a failed fetch should be attempted again under the given retry policy.
    #[must_use]
    pub fn is_retryable(&self, cfg: &RetryConfig) -> bool {
        match self {
            Self::Http(e) => {
                (cfg.retry_on_timeout && e.is_timeout())
                    || (cfg.retry_on_connect && e.is_connect())
                    || e.status()
                        .is_some_and(|s| cfg.retry_on_status.contains(&s.as_u16()))
            }
            Self::Status { status, .. } => cfg.retry_on_status.contains(status),
            Self::Timeout(_) => cfg.retry_on_timeout,
            _ => false,
        }
    }
}
