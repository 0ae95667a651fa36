//! # View Model
//!
//! Display-ready projection of a [`Model`]. Both credential formats share a
//! single [`Card`] shape; what differs is the [`CredentialKind`] and the list
//! of labelled attributes shown for it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attribute::{CredentialKind, attribute_text};
use crate::flow::{FlowStatus, Model};

/// Labelled attributes shown on a licence card. Multi-key entries are joined
/// with a space.
pub const LICENCE_FIELDS: &[(&str, &[&str])] = &[
    ("Name", &["given_name", "family_name"]),
    ("Date of Birth", &["birth_date"]),
    ("Expiry Date", &["expiry_date"]),
    ("Driving Licence", &["document_number"]),
];

/// Labelled attributes shown on a health credential card.
pub const CREDENTIAL_FIELDS: &[(&str, &[&str])] = &[
    ("Name", &["givenName", "familyName"]),
    ("Condition", &["condition"]),
    ("Diagnosis Date", &["diagnosisDate"]),
    ("Medical Provider Name", &["medicalProviderName"]),
    ("Medical Provider Licence Number", &["medicalProviderLicenceNumber"]),
    ("Medical Provider Licence Type", &["medicalProviderLicenceType"]),
    ("Licensing Authority", &["licensingAuthority"]),
];

/// A single labelled value on a card.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Field {
    /// Display label.
    pub label: String,

    /// Display value, absent when the credential does not carry it.
    pub value: Option<String>,
}

/// A credential rendered as labelled fields.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Card {
    /// Which credential format the card shows.
    pub kind: CredentialKind,

    /// Card fields, in display order.
    pub fields: Vec<Field>,
}

impl Card {
    /// Build a card for `view`. A missing view yields a card whose fields are
    /// all absent.
    #[must_use]
    pub fn new(kind: CredentialKind, view: Option<&Value>) -> Self {
        let template = match kind {
            CredentialKind::Licence => LICENCE_FIELDS,
            CredentialKind::Credential => CREDENTIAL_FIELDS,
        };
        let fields = template
            .iter()
            .map(|(label, keys)| {
                let parts: Vec<String> = keys
                    .iter()
                    .filter_map(|key| view.and_then(|v| attribute_text(v, kind, key)))
                    .collect();
                Field {
                    label: (*label).to_string(),
                    value: (!parts.is_empty()).then(|| parts.join(" ")),
                }
            })
            .collect();

        Self {
            kind,
            fields,
        }
    }

    /// Value of the field with `label`, if shown.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.label == label)?.value.as_deref()
    }
}

/// Everything a page needs to render the current flow.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ViewModel {
    /// Active step.
    pub status: FlowStatus,

    /// Address the page should display.
    pub address: Option<String>,

    /// Link the user follows to open their wallet.
    pub wallet_url: Option<String>,

    /// Licence card, once the licence is verified.
    pub licence: Option<Card>,

    /// Credential cards, once the credential presentation is verified.
    pub credentials: Vec<Card>,

    /// Most recent failure.
    pub error: Option<String>,

    /// Whether a reset is offered.
    pub can_reset: bool,
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let credentials = model.credentials.as_ref().map_or_else(Vec::new, |claims| {
            claims
                .iter()
                .map(|c| {
                    let view = c.as_ref().map(|c| Value::Object(c.clone()));
                    Card::new(CredentialKind::Credential, view.as_ref())
                })
                .collect()
        });

        Self {
            status: model.status,
            address: model.address.clone(),
            wallet_url: model.wallet_url.clone(),
            licence: model.licence.as_ref().map(|l| Card::new(CredentialKind::Licence, Some(l))),
            credentials,
            error: model.error.clone(),
            can_reset: model.status != FlowStatus::NotStarted,
        }
    }
}
