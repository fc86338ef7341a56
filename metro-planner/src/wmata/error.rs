//! WMATA client error types.

use reqwest::header::InvalidHeaderValue;

use super::convert::ConversionError;

/// Errors from the WMATA rail API.
///
/// Endpoint-specific variants carry the endpoint name (`jPath`, `jStations`,
/// ...) so a failure can be traced to the request that caused it.
#[derive(Debug, thiserror::Error)]
pub enum WmataError {
    /// The request never produced a response (network error, timeout, ...)
    #[error("WMATA request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The key cannot be sent as an `api_key` header
    #[error("API key is not a valid header value")]
    InvalidApiKey(#[source] InvalidHeaderValue),

    /// WMATA rejected the key (401 or 403)
    #[error("WMATA rejected the API key")]
    Unauthorized,

    /// Request quota exhausted (429)
    #[error("rate limited by WMATA API")]
    RateLimited,

    /// Any other non-success status
    #[error("{endpoint} returned status {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },

    /// The body is not the JSON the endpoint documents
    #[error("{endpoint} returned malformed JSON: {source}")]
    Json {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
        /// Start of the offending body.
        excerpt: String,
    },

    /// The body parsed but its content is unusable
    #[error("{endpoint} returned unusable data: {source}")]
    Conversion {
        endpoint: &'static str,
        #[source]
        source: ConversionError,
    },
}

impl WmataError {
    /// Whether retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            WmataError::Http(e) => e.is_timeout() || e.is_connect(),
            WmataError::RateLimited => true,
            WmataError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
