//! Provider error type.

use thiserror::Error;

/// Errors returned by an [`HttpClient`](super::HttpClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The server answered 404: the resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status other than 404.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// The request could not be completed (DNS, connect, timeout, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),
}

impl ProviderError {
    /// Whether the error is a definitive "resource does not exist" answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}
