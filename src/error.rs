use thiserror::Error;

/// Failure of a catalog or series fetch.
///
/// "No data" is never an error: a well-formed response without usable
/// observations is reported through [`crate::models::SeriesResult::has_data`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request was rejected before it was sent (e.g. an empty code).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transport failure: DNS, connect, TLS, timeout, body read.
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("request to {url} failed with HTTP {status}")]
    Http { url: String, status: u16 },

    /// The API answered with its own error payload (`[{"message": [...]}]`).
    #[error("world bank api error: {0}")]
    Api(String),

    /// The response was not the expected `[metadata, payload]` envelope.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

impl FetchError {
    /// True for failures where the request never produced a usable response body.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Network { .. } | FetchError::Http { .. })
    }

    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else if err.is_decode() {
            return FetchError::UnexpectedFormat(format!("response body is not JSON: {err}"));
        } else {
            err.to_string()
        };
        FetchError::Network {
            url: url.to_string(),
            message,
        }
    }
}
