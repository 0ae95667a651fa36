//! # Credential-exchange provider
//!
//! Client for the provider's presentation-request API. Every call carries
//! the service's client credentials, which never leave the backend.

use anyhow::{Result, anyhow};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;

/// Presentation request created by the provider.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreatedRequest {
    /// Wallet request URI.
    pub url: String,

    /// Identifier of the request.
    pub request_id: String,
}

/// Status of a presentation request as reported by the provider.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RequestStatus {
    /// Provider status, relayed verbatim (`initiated`, `verified`, ...).
    pub status: String,

    /// The received presentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<Value>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(flatten)]
    body: Value,
}

/// Provider API client.
#[derive(Clone, Debug)]
pub struct Provider {
    client: Client,
    config: Config,
}

impl Provider {
    /// Create a client for the provider described by `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create a presentation request for the licence template.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    pub async fn request_licence(&self) -> Result<CreatedRequest> {
        self.create_request(&self.config.licence_template).await
    }

    /// Create a presentation request for the verifiable credential template.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    pub async fn request_credential(&self) -> Result<CreatedRequest> {
        self.create_request(&self.config.credential_template).await
    }

    /// Check the status of a presentation request.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    pub async fn check(&self, request_id: &str) -> Result<RequestStatus> {
        self.post("presentation-request/check", serde_json::json!({ "request_id": request_id }))
            .await
    }

    /// Exchange a wallet response code for the presentation result.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    pub async fn result(&self, response_code: &str) -> Result<Value> {
        self.post(
            "presentation-request/result",
            serde_json::json!({ "response_code": response_code }),
        )
        .await
    }

    async fn create_request(&self, template_id: &str) -> Result<CreatedRequest> {
        self.post("presentation-request", serde_json::json!({ "template_id": template_id })).await
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: Value) -> Result<T> {
        let url = self.config.provider_url.join(endpoint)?;
        tracing::debug!("provider request: {url}");

        let request = Credentials {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            body,
        };
        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("provider returned {status}: {text}"));
        }
        Ok(response.json().await?)
    }
}
