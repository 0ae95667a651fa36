//! # Wire types
//!
//! Request and response bodies exchanged with the backend proxy routes.
//! Field names are camel-cased on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response to `GET /start-licence-flow`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct StartLicenceResponse {
    /// Provider request URI (`mdoc-openid4vp://...`).
    pub url: String,
}

/// Body of `POST /exchange-licence-code`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeCodeRequest {
    /// Code returned by the wallet in the URL fragment.
    #[serde(default, alias = "response_code")]
    pub response_code: String,
}

/// Response to `GET /start-credential-flow`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresentationRequest {
    /// Provider request URI (`openid-vc://...`).
    pub url: String,

    /// Opaque identifier used to poll for the result.
    #[serde(alias = "request_id")]
    pub request_id: String,
}

/// Body of `POST /check-credential-status`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    /// Identifier returned when the flow was started.
    #[serde(default, alias = "request_id")]
    pub request_id: String,
}

/// Provider-reported state of a presentation request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStatus {
    /// The request exists but the wallet has not answered yet.
    #[default]
    Initiated,

    /// A presentation was received and verified by the provider.
    Verified,

    /// Any other status the provider may report.
    #[serde(other)]
    Other,
}

impl PresentationStatus {
    /// Whether polling should stop on this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl fmt::Display for PresentationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initiated => "initiated",
            Self::Verified => "verified",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Response to `POST /check-credential-status`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PresentationResult {
    /// Current status of the request.
    pub status: PresentationStatus,

    /// The presentation, once one has been received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<Presentation>,
}

/// A verifiable presentation as relayed by the provider.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// Compact-encoded credentials. Entries are kept as raw JSON so a
    /// malformed entry only affects its own card.
    #[serde(default)]
    pub verifiable_credential: Vec<Value>,

    /// Remaining presentation members, passed through untouched.
    #[serde(flatten)]
    pub other: serde_json::Map<String, Value>,
}
