//! Sensor source error types
//!
//! Every way a fetch against the sensor endpoints can fail. These never
//! escape a poller: they are turned into an error annotation or a log line.

use thiserror::Error;

/// Errors that can occur when fetching from the sensor source
#[derive(Error, Debug)]
pub enum FetchError {
    /// Could not connect to the source
    #[error("Sensor source unavailable")]
    Unavailable,

    /// No response within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Request could not be sent or the response could not be read
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response received with a non-success status
    #[error("HTTP error {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not the expected JSON shape
    #[error("Malformed payload: {0}")]
    Decode(String),

    /// Base URL could not be combined with an endpoint path
    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Classify a transport error the way the diagnostics care about it
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unavailable
        } else {
            FetchError::Request(err)
        }
    }

    /// Whether the failure happened before any response arrived
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            FetchError::Unavailable | FetchError::Timeout | FetchError::Request(_)
        )
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
