//! # Wallet links
//!
//! The provider returns presentation requests as custom-scheme URIs intended
//! for a native wallet. The demo hands them to the wallet's web site instead,
//! so the scheme prefix is rewritten to an HTTPS base.

use serde::{Deserialize, Serialize};

use crate::attribute::CredentialKind;

/// URI scheme prefix used for mobile driving licence requests.
pub const MDOC_SCHEME: &str = "mdoc-openid4vp://";

/// URI scheme prefix used for verifiable credential requests.
pub const OPENID_VC_SCHEME: &str = "openid-vc://";

/// Wallet web-site entry points.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct WalletConfig {
    /// Replacement for [`MDOC_SCHEME`].
    pub licence_base: String,

    /// Replacement for [`OPENID_VC_SCHEME`].
    pub credential_base: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            licence_base: "https://wallet.verifiablecredentials.dev/mdl/request".into(),
            credential_base: "https://wallet.verifiablecredentials.dev/siop".into(),
        }
    }
}

impl WalletConfig {
    /// Rewrite a provider request URI into a clickable wallet link. URIs that
    /// do not start with the expected scheme are returned unchanged.
    #[must_use]
    pub fn wallet_url(&self, kind: CredentialKind, request_uri: &str) -> String {
        let (scheme, base) = match kind {
            CredentialKind::Licence => (MDOC_SCHEME, &self.licence_base),
            CredentialKind::Credential => (OPENID_VC_SCHEME, &self.credential_base),
        };
        request_uri
            .strip_prefix(scheme)
            .map_or_else(|| request_uri.to_string(), |rest| format!("{base}{rest}"))
    }
}
