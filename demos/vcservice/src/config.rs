//! # Service configuration
//!
//! Read from the environment (optionally via a `.env` file).

use std::env;

use anyhow::{Context, Result, anyhow};
use url::Url;

/// Settings needed to reach the credential-exchange provider.
#[derive(Clone, Debug)]
pub struct Config {
    /// Address the service listens on.
    pub listen_addr: String,

    /// Base of the provider's presentation-request API, ending in `/`.
    pub provider_url: Url,

    /// Client identifier registered with the provider.
    pub client_id: String,

    /// Client secret registered with the provider.
    pub client_secret: String,

    /// Provider template describing the licence presentation.
    pub licence_template: String,

    /// Provider template describing the verifiable credential presentation.
    pub credential_template: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `AUTH0_DOMAIN`, `AUTH0_CLIENT_ID` and `AUTH0_SECRET` are required.
    /// `AUTH0_BASE_URL` replaces the provider URL derived from the domain.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first required variable that is not set,
    /// or if the provider URL is invalid.
    pub fn from_env() -> Result<Self> {
        let provider_url = match env::var("AUTH0_BASE_URL") {
            Ok(base) => base,
            Err(_) => format!("https://{}/vcs/", required("AUTH0_DOMAIN")?),
        };

        Ok(Self {
            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            provider_url: provider_base(&provider_url)?,
            client_id: required("AUTH0_CLIENT_ID")?,
            client_secret: required("AUTH0_SECRET")?,
            licence_template: env::var("AUTH0_MDL_TEMPLATE").unwrap_or_default(),
            credential_template: env::var("AUTH0_VC_TEMPLATE").unwrap_or_default(),
        })
    }
}

/// Parse a provider base URL, making sure it ends in `/` so that endpoint
/// names join beneath it.
///
/// # Errors
///
/// Returns an error if `url` is not an absolute URL.
pub fn provider_base(url: &str) -> Result<Url> {
    let mut base = Url::parse(url).with_context(|| format!("invalid provider url {url}"))?;
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    Ok(base)
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| anyhow!("{name} not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_gets_trailing_slash() {
        let base = provider_base("https://tenant.example/vcs").unwrap();
        assert_eq!(base.join("presentation-request").unwrap().as_str(),
            "https://tenant.example/vcs/presentation-request");
        assert!(provider_base("tenant.example").is_err());
    }
}
