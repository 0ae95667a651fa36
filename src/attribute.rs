//! # Attribute Accessor
//!
//! Null-safe lookups of named claims inside the two credential shapes the
//! verifier displays. A missing link anywhere in the path yields `None`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ISO/IEC 18013-5 namespace holding mobile driving licence attributes.
pub const MDL_NAMESPACE: &str = "org.iso.18013.5.1";

/// The credential shapes understood by [`get_attribute`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum CredentialKind {
    /// Mobile driving licence: `attributes.<MDL_NAMESPACE>.<key>`.
    Licence,

    /// Decoded verifiable credential claims: `vc.credentialSubject.<key>`.
    Credential,
}

impl CredentialKind {
    /// Path from the root of the credential view to the attribute map.
    #[must_use]
    pub const fn path(self) -> [&'static str; 2] {
        match self {
            Self::Licence => ["attributes", MDL_NAMESPACE],
            Self::Credential => ["vc", "credentialSubject"],
        }
    }
}

/// Look up `key` within the attribute map of a credential view.
#[must_use]
pub fn get_attribute<'a>(view: &'a Value, kind: CredentialKind, key: &str) -> Option<&'a Value> {
    kind.path().iter().try_fold(view, |v, segment| v.get(segment))?.get(key)
}

/// Look up `key` and render it for display. Strings are shown as-is, other
/// non-null values as compact JSON.
#[must_use]
pub fn attribute_text(view: &Value, kind: CredentialKind, key: &str) -> Option<String> {
    match get_attribute(view, kind, key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn licence_attribute() {
        let licence = json!({
            "attributes": {
                "org.iso.18013.5.1": {
                    "given_name": "Jane",
                    "family_name": "Doe",
                    "age_over_18": true
                }
            }
        });
        assert_eq!(get_attribute(&licence, CredentialKind::Licence, "given_name"), Some(&json!("Jane")));
        assert_eq!(attribute_text(&licence, CredentialKind::Licence, "age_over_18").as_deref(), Some("true"));
        assert_eq!(get_attribute(&licence, CredentialKind::Licence, "portrait"), None);
    }

    #[test]
    fn credential_attribute() {
        let claims = json!({ "vc": { "credentialSubject": { "condition": "Asthma" } } });
        assert_eq!(
            attribute_text(&claims, CredentialKind::Credential, "condition").as_deref(),
            Some("Asthma")
        );
        // the licence path does not apply to a credential
        assert_eq!(get_attribute(&claims, CredentialKind::Licence, "condition"), None);
    }

    #[test]
    fn missing_segments() {
        let views = [
            Value::Null,
            json!("scalar"),
            json!([]),
            json!({}),
            json!({ "attributes": null }),
            json!({ "attributes": { "org.iso.18013.5.1": 7 } }),
            json!({ "vc": {} }),
            json!({ "vc": { "credentialSubject": null } }),
        ];
        for view in &views {
            for kind in [CredentialKind::Licence, CredentialKind::Credential] {
                assert_eq!(get_attribute(view, kind, "given_name"), None, "{view}");
                assert_eq!(attribute_text(view, kind, "given_name"), None, "{view}");
            }
        }
    }

    #[test]
    fn null_value_is_absent() {
        let claims = json!({ "vc": { "credentialSubject": { "condition": null } } });
        assert_eq!(attribute_text(&claims, CredentialKind::Credential, "condition"), None);
    }
}
