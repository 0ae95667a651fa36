//! # Backend Provider
//!
//! The presentation flows call out to the application's backend through the
//! [`Backend`] trait. [`crate::client::HttpBackend`] implements it against
//! the proxy routes; tests supply their own implementation.

use std::future::Future;

use serde_json::Value;

pub use crate::error::Result;
pub use crate::types::{PresentationRequest, PresentationResult};

/// Backend calls needed to run the licence and credential flows.
pub trait Backend: Send + Sync {
    /// Start a licence presentation, returning the provider request URI.
    fn start_licence_flow(&self) -> impl Future<Output = Result<String>> + Send;

    /// Exchange a wallet response code for the licence presentation result.
    fn exchange_licence_code(
        &self, response_code: &str,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// Start a verifiable credential presentation.
    fn start_credential_flow(&self) -> impl Future<Output = Result<PresentationRequest>> + Send;

    /// Query the status of a verifiable credential presentation.
    fn check_credential_status(
        &self, request_id: &str,
    ) -> impl Future<Output = Result<PresentationResult>> + Send;
}
