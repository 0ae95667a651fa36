//! # Flow State
//!
//! The verifier runs two presentation flows in sequence: a mobile driving
//! licence first, then a verifiable credential. [`FlowStatus`] tracks which
//! step is active and [`Model`] holds everything collected along the way.
//!
//! Transitions are a pure function of the current status and an [`Event`]
//! (see [`transition`]), so the whole flow can be exercised without a UI or a
//! network.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::token::Claims;

/// Step of the presentation flow currently active.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum FlowStatus {
    /// Nothing started yet.
    #[default]
    NotStarted,

    /// Waiting for the user to present a licence from their wallet.
    LicenceWaiting,

    /// The wallet returned a response code; fetching the licence result.
    LicenceFetching,

    /// The licence presentation has been verified by the provider.
    LicenceVerified,

    /// Waiting for the user to present a verifiable credential.
    CredentialWaiting,

    /// The verifiable credential presentation has been verified.
    CredentialVerified,
}

/// Things that happen to a flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The user asked to start the licence flow.
    LicenceStarted,

    /// A wallet link is available for the flow that is waiting.
    WalletLinkReady(String),

    /// The page loaded with a licence response code in its fragment. Carries
    /// the page address with the fragment removed.
    LicenceCodeReceived {
        /// Address to show once the code has been consumed.
        address: String,
    },

    /// The licence response code was exchanged for a result.
    LicenceVerified(Value),

    /// A credential presentation request was created.
    CredentialStarted {
        /// Wallet link for the request.
        wallet_url: String,
        /// Identifier used to poll for the result.
        request_id: String,
    },

    /// The credential presentation was verified. One entry per presented
    /// token; `None` where a token could not be decoded.
    CredentialVerified(Vec<Option<Claims>>),

    /// A step failed. The flow stays where it is.
    Failed(String),

    /// The user reset the flow.
    Reset,
}

/// Compute the status that follows `status` on `event`, or `None` if the
/// event is not valid in that status.
#[must_use]
pub const fn transition(status: FlowStatus, event: &Event) -> Option<FlowStatus> {
    use FlowStatus::{
        CredentialVerified, CredentialWaiting, LicenceFetching, LicenceVerified, LicenceWaiting,
        NotStarted,
    };

    match (status, event) {
        (NotStarted, Event::LicenceStarted) => Some(LicenceWaiting),
        (LicenceWaiting | CredentialWaiting, Event::WalletLinkReady(_))
        | (_, Event::Failed(_)) => Some(status),
        (NotStarted | LicenceWaiting, Event::LicenceCodeReceived { .. }) => Some(LicenceFetching),
        (LicenceFetching, Event::LicenceVerified(_)) => Some(LicenceVerified),
        (LicenceVerified, Event::CredentialStarted { .. }) => Some(CredentialWaiting),
        (CredentialWaiting, Event::CredentialVerified(_)) => Some(CredentialVerified),
        (_, Event::Reset) => Some(NotStarted),
        _ => None,
    }
}

/// State of one page session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Model {
    /// Active step.
    pub status: FlowStatus,

    /// Address the page should display.
    pub address: Option<String>,

    /// Wallet link for the waiting flow.
    pub wallet_url: Option<String>,

    /// Identifier of the active credential presentation request.
    pub request_id: Option<String>,

    /// Licence presentation result.
    pub licence: Option<Value>,

    /// Decoded credential claim sets.
    pub credentials: Option<Vec<Option<Claims>>>,

    /// Most recent failure, for display.
    pub error: Option<String>,
}

impl Model {
    /// Apply `event`, returning `false` (and leaving the model untouched) if
    /// it is not valid for the current status.
    pub fn update(&mut self, event: Event) -> bool {
        let Some(next) = transition(self.status, &event) else {
            tracing::warn!(status = ?self.status, ?event, "ignoring event");
            return false;
        };
        if next != self.status {
            tracing::info!(from = ?self.status, to = ?next, "flow transition");
        }

        match event {
            Event::LicenceStarted => {
                self.wallet_url = None;
                self.error = None;
            }
            Event::WalletLinkReady(url) => self.wallet_url = Some(url),
            Event::LicenceCodeReceived { address } => {
                self.address = Some(address);
                self.wallet_url = None;
                self.error = None;
            }
            Event::LicenceVerified(result) => self.licence = Some(result),
            Event::CredentialStarted {
                wallet_url,
                request_id,
            } => {
                self.wallet_url = Some(wallet_url);
                self.request_id = Some(request_id);
                self.error = None;
            }
            Event::CredentialVerified(claims) => {
                self.credentials = Some(claims);
                self.request_id = None;
                self.wallet_url = None;
            }
            Event::Failed(message) => self.error = Some(message),
            Event::Reset => {
                *self = Self {
                    address: self.address.take(),
                    ..Self::default()
                };
            }
        }

        self.status = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn started() -> Event {
        Event::CredentialStarted {
            wallet_url: "https://wallet/siop?r".into(),
            request_id: "req-1".into(),
        }
    }

    #[test]
    fn happy_path() {
        let mut model = Model::default();
        assert!(model.update(Event::LicenceStarted));
        assert!(model.update(Event::WalletLinkReady("https://wallet/mdl".into())));
        assert_eq!(model.status, FlowStatus::LicenceWaiting);
        assert_eq!(model.wallet_url.as_deref(), Some("https://wallet/mdl"));

        // the wallet navigates back; a fresh page starts from scratch
        let mut model = Model::default();
        assert!(model.update(Event::LicenceCodeReceived { address: "https://x/".into() }));
        assert_eq!(model.status, FlowStatus::LicenceFetching);
        assert!(model.update(Event::LicenceVerified(json!({ "attributes": {} }))));
        assert_eq!(model.status, FlowStatus::LicenceVerified);

        assert!(model.update(started()));
        assert_eq!(model.status, FlowStatus::CredentialWaiting);
        assert_eq!(model.request_id.as_deref(), Some("req-1"));

        assert!(model.update(Event::CredentialVerified(vec![None])));
        assert_eq!(model.status, FlowStatus::CredentialVerified);
        assert_eq!(model.credentials, Some(vec![None]));
        assert_eq!(model.request_id, None);
        assert!(model.licence.is_some());
    }

    // Models and events compare as plain values, so snapshots can be diffed.
    fn assert_same<T: Eq + std::fmt::Debug>(a: &T, b: &T) {
        assert!(a == b, "{a:?} != {b:?}");
    }

    #[test]
    fn rejected_event_keeps_snapshot() {
        let mut model = Model::default();
        model.update(Event::LicenceCodeReceived { address: "https://x/".into() });
        let before = model.clone();

        let event = started();
        assert!(!model.update(event.clone()));
        assert_same(&model, &before);
        assert_same(&event, &started());
    }

    #[test]
    fn out_of_order_events() {
        let cases = [
            (FlowStatus::NotStarted, started()),
            (FlowStatus::NotStarted, Event::WalletLinkReady("u".into())),
            (FlowStatus::NotStarted, Event::LicenceVerified(Value::Null)),
            (FlowStatus::LicenceWaiting, Event::LicenceStarted),
            (FlowStatus::LicenceVerified, Event::LicenceCodeReceived { address: "a".into() }),
            (FlowStatus::CredentialWaiting, Event::LicenceVerified(Value::Null)),
            (FlowStatus::LicenceVerified, Event::CredentialVerified(vec![])),
            (FlowStatus::CredentialVerified, started()),
        ];
        for (status, event) in cases {
            assert_eq!(transition(status, &event), None, "{status:?} on {event:?}");
        }

        let mut model = Model::default();
        assert!(!model.update(Event::CredentialVerified(vec![])));
        assert_eq!(model, Model::default());
    }

    #[test]
    fn failure_keeps_status() {
        let mut model = Model::default();
        model.update(Event::LicenceStarted);
        assert!(model.update(Event::Failed("network error".into())));
        assert_eq!(model.status, FlowStatus::LicenceWaiting);
        assert_eq!(model.error.as_deref(), Some("network error"));
    }

    #[test]
    fn reset_clears_results() {
        let mut model = Model::default();
        model.update(Event::LicenceCodeReceived { address: "https://x/".into() });
        model.update(Event::LicenceVerified(json!({})));
        model.update(started());
        model.update(Event::Failed("oops".into()));

        for status in [
            FlowStatus::NotStarted,
            FlowStatus::LicenceWaiting,
            FlowStatus::LicenceFetching,
            FlowStatus::LicenceVerified,
            FlowStatus::CredentialWaiting,
            FlowStatus::CredentialVerified,
        ] {
            assert_eq!(transition(status, &Event::Reset), Some(FlowStatus::NotStarted));
        }

        assert!(model.update(Event::Reset));
        assert_eq!(
            model,
            Model {
                address: Some("https://x/".into()),
                ..Model::default()
            }
        );
    }
}
