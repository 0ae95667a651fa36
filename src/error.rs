//! # Errors
//!
//! Failures raised while running a presentation flow. None of these are fatal
//! to the flow itself: the [`crate::verifier::Verifier`] logs them, records
//! the message for display and leaves the flow in its current waiting state.

use thiserror::Error;

/// Result type for presentation flow operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors encountered while talking to the backend or preparing results.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or its response body could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status code.
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// A token in a presentation could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A backend or wallet URL could not be parsed.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The requested step is not valid in the flow's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// Reasons a compact token payload could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The token was empty.
    #[error("token is empty")]
    Empty,

    /// The token has no payload segment.
    #[error("token has no payload segment")]
    MissingPayload,

    /// The payload segment is not valid base64.
    #[error("payload is not valid base64: {0}")]
    Base64(String),

    /// The payload is not a UTF-8 JSON object.
    #[error("payload is not a JSON object: {0}")]
    Json(String),
}
