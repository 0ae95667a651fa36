//! # Token Decoder
//!
//! Decodes the payload segment of a compact (dot-separated) signed token into
//! its claims so they can be displayed.
//!
//! Decoding is for display only. No signature, expiry or issuer checks are
//! made: trust in a presentation comes from the credential-exchange provider
//! that reported it as verified, never from this module.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Claims carried in a token payload.
pub type Claims = Map<String, Value>;

/// Decode the payload (second) segment of a compact token.
///
/// Both URL-safe and standard base64 alphabets are accepted, with or without
/// padding. Every occurrence of `+` and `/` is normalised, so payloads
/// containing several of them decode correctly.
///
/// # Errors
///
/// Returns a [`DecodeError`] when the token is empty, has no payload segment,
/// or the payload is not base64-encoded UTF-8 JSON object text.
pub fn decode_token(token: &str) -> Result<Claims, DecodeError> {
    if token.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    let Some(payload) = token.split('.').nth(1).filter(|p| !p.is_empty()) else {
        return Err(DecodeError::MissingPayload);
    };

    let normalised: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    let bytes = Base64UrlUnpadded::decode_vec(&normalised)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        Ok(other) => Err(DecodeError::Json(format!("expected object, found {other}"))),
        Err(e) => Err(DecodeError::Json(e.to_string())),
    }
}

/// Decode a token held in a JSON value, as found in a presentation's
/// `verifiableCredential` array. Anything other than a string is treated as
/// an absent token.
///
/// # Errors
///
/// Returns [`DecodeError::Empty`] for non-string values, otherwise as for
/// [`decode_token`].
pub fn decode_value(token: &Value) -> Result<Claims, DecodeError> {
    token.as_str().map_or(Err(DecodeError::Empty), decode_token)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn encode(claims: &Value) -> String {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"ES256","typ":"JWT"}"#);
        let payload = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }

    #[test]
    fn round_trip() {
        let claims = json!({
            "iss": "did:web:issuer.example",
            "vc": {
                "credentialSubject": {
                    "givenName": "Normal",
                    "familyName": "Person",
                    "condition": "Asthma"
                }
            }
        });
        let decoded = decode_token(&encode(&claims)).expect("should decode");
        assert_eq!(Value::Object(decoded), claims);
    }

    // Payloads whose encoding contains several `-` and `_` characters.
    #[test]
    fn many_url_safe_chars() {
        let claims = json!({ "data": "???>>>???>>>~~~~" });
        let token = encode(&claims);
        let payload = token.split('.').nth(1).unwrap();
        assert!(payload.matches(['-', '_']).count() > 1, "payload should exercise substitution");

        let decoded = decode_token(&token).expect("should decode");
        assert_eq!(Value::Object(decoded), claims);
    }

    #[test]
    fn standard_alphabet_with_padding() {
        let token = "e30.eyJzdWIiOiAiYWJjIn0=.sig";
        let decoded = decode_token(token).expect("should decode");
        assert_eq!(decoded.get("sub"), Some(&json!("abc")));
    }

    #[test]
    fn malformed() {
        assert_eq!(decode_token(""), Err(DecodeError::Empty));
        assert_eq!(decode_token("   "), Err(DecodeError::Empty));
        assert_eq!(decode_token("header-only"), Err(DecodeError::MissingPayload));
        assert_eq!(decode_token("header..sig"), Err(DecodeError::MissingPayload));
        assert!(matches!(decode_token("a.!!!.c"), Err(DecodeError::Base64(_))));

        let not_json = Base64UrlUnpadded::encode_string(b"not json");
        assert!(matches!(decode_token(&format!("a.{not_json}.c")), Err(DecodeError::Json(_))));

        let array = Base64UrlUnpadded::encode_string(b"[1,2]");
        assert!(matches!(decode_token(&format!("a.{array}.c")), Err(DecodeError::Json(_))));
    }

    #[test]
    fn non_string_value() {
        assert_eq!(decode_value(&Value::Null), Err(DecodeError::Empty));
        assert_eq!(decode_value(&json!(42)), Err(DecodeError::Empty));
    }
}
