//! Scripted backend used by the flow tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64ct::{Base64UrlUnpadded, Encoding};
use credibil_verify::Error;
use credibil_verify::provider::{Backend, PresentationRequest, PresentationResult, Result};
use credibil_verify::types::PresentationStatus;
use serde_json::{Value, json};

pub const REQUEST_ID: &str = "0bd3c0a6-5f13-4c2b-8a67-b6c1f5a3f2de";

#[derive(Clone, Default)]
pub struct Provider {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    statuses: Mutex<VecDeque<PresentationStatus>>,
    codes: Mutex<Vec<String>>,
    status_checks: AtomicUsize,
    offline: AtomicBool,
    latency: Mutex<Duration>,
}

impl Provider {
    pub fn new() -> Self {
        Self::default()
    }

    // Statuses returned by successive status checks; `initiated` once spent.
    pub fn with_statuses(self, statuses: &[PresentationStatus]) -> Self {
        self.inner.statuses.lock().unwrap().extend(statuses.iter().cloned());
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    // Delay before answering code exchanges and presentation requests.
    pub fn set_latency(&self, latency: Duration) {
        *self.inner.latency.lock().unwrap() = latency;
    }

    pub fn status_checks(&self) -> usize {
        self.inner.status_checks.load(Ordering::SeqCst)
    }

    pub fn codes(&self) -> Vec<String> {
        self.inner.codes.lock().unwrap().clone()
    }

    fn online(&self) -> Result<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(Error::Network("connection refused".into()));
        }
        Ok(())
    }

    async fn respond(&self) -> Result<()> {
        let latency = *self.inner.latency.lock().unwrap();
        tokio::time::sleep(latency).await;
        self.online()
    }
}

pub fn licence() -> Value {
    json!({
        "attributes": {
            "org.iso.18013.5.1": {
                "given_name": "Jane",
                "family_name": "Doe",
                "birth_date": "1990-01-01",
                "expiry_date": "2030-06-30",
                "document_number": "D1234567"
            }
        }
    })
}

pub fn health_token() -> String {
    let claims = json!({
        "iss": "did:web:clinic.example",
        "vc": {
            "type": ["VerifiableCredential", "HealthCredential"],
            "credentialSubject": {
                "givenName": "Jane",
                "familyName": "Doe",
                "condition": "Asthma",
                "diagnosisDate": "2021-03-04",
                "medicalProviderName": "Dr Smith",
                "medicalProviderLicenceNumber": "MP-42",
                "medicalProviderLicenceType": "GP",
                "licensingAuthority": "Medical Council"
            }
        }
    });
    let header = Base64UrlUnpadded::encode_string(br#"{"alg":"ES256K","typ":"JWT"}"#);
    let payload = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
    format!("{header}.{payload}.c2ln")
}

impl Backend for Provider {
    async fn start_licence_flow(&self) -> Result<String> {
        self.online()?;
        Ok("mdoc-openid4vp://?request_uri=https%3A%2F%2Fprovider.example%2Fr%2F1".into())
    }

    async fn exchange_licence_code(&self, response_code: &str) -> Result<Value> {
        self.respond().await?;
        self.inner.codes.lock().unwrap().push(response_code.into());
        Ok(licence())
    }

    async fn start_credential_flow(&self) -> Result<PresentationRequest> {
        self.respond().await?;
        Ok(PresentationRequest {
            url: "openid-vc://?request_uri=https%3A%2F%2Fprovider.example%2Fr%2F2".into(),
            request_id: REQUEST_ID.into(),
        })
    }

    async fn check_credential_status(&self, request_id: &str) -> Result<PresentationResult> {
        assert_eq!(request_id, REQUEST_ID);
        self.inner.status_checks.fetch_add(1, Ordering::SeqCst);
        self.online()?;

        let status = self
            .inner
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PresentationStatus::Initiated);
        let presentation = status.is_terminal().then(|| {
            serde_json::from_value(json!({
                "holder": "did:key:z6MkholderA",
                "verifiableCredential": [health_token(), "not-a-token"]
            }))
            .unwrap()
        });
        Ok(PresentationResult {
            status,
            presentation,
        })
    }
}
