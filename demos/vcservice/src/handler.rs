//! # Request handlers
//!
//! Each handler forwards one step of a presentation flow to the provider.

pub mod verifier;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

/// Successful JSON response.
pub struct AppJson<T>(pub T);

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

/// Failed request. Rendered as `{ "error": "..." }`.
#[derive(Debug)]
pub enum AppError {
    /// Failure with a specific status code.
    Status(StatusCode, String),

    /// Any other failure, reported as a server error.
    Other(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Status(status, message) => (status, message),
            Self::Other(e) => {
                tracing::error!("{e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(e: E) -> Self {
        Self::Other(e.into())
    }
}
