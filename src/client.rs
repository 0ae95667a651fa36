//! # HTTP Backend
//!
//! [`Backend`] implementation that calls the verifier's proxy routes over
//! HTTP.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::provider::Backend;
use crate::types::{
    ExchangeCodeRequest, PresentationRequest, PresentationResult, StartLicenceResponse,
    StatusRequest,
};

/// Calls the backend proxy routes rooted at a base URL.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    /// Create a backend client for the proxy at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if `base` is not an absolute URL.
    pub fn new(base: &str) -> Result<Self> {
        Self::with_client(Client::new(), base)
    }

    /// Create a backend client using a pre-configured HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if `base` is not an absolute URL.
    pub fn with_client(client: Client, base: &str) -> Result<Self> {
        let mut base = Url::parse(base)?;
        // keep any path prefix when joining route names
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self { client, base })
    }

    fn route(&self, name: &str) -> Result<Url> {
        Ok(self.base.join(name)?)
    }
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

impl Backend for HttpBackend {
    async fn start_licence_flow(&self) -> Result<String> {
        let response = self.client.get(self.route("start-licence-flow")?).send().await?;
        let started: StartLicenceResponse = json(response).await?;
        Ok(started.url)
    }

    async fn exchange_licence_code(&self, response_code: &str) -> Result<Value> {
        let body = ExchangeCodeRequest {
            response_code: response_code.into(),
        };
        let response =
            self.client.post(self.route("exchange-licence-code")?).json(&body).send().await?;
        json(response).await
    }

    async fn start_credential_flow(&self) -> Result<PresentationRequest> {
        let response = self.client.get(self.route("start-credential-flow")?).send().await?;
        json(response).await
    }

    async fn check_credential_status(&self, request_id: &str) -> Result<PresentationResult> {
        let body = StatusRequest {
            request_id: request_id.into(),
        };
        let response =
            self.client.post(self.route("check-credential-status")?).json(&body).send().await?;
        json(response).await
    }
}
