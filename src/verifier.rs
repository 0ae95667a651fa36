//! # Verifier
//!
//! A [`Verifier`] is one page session: it owns the flow [`Model`], calls the
//! [`Backend`] and moves the flow through its steps.
//!
//! Network failures never surface as a broken flow. They are logged, recorded
//! on the model for display, and the flow stays in the step it was in; the
//! user recovers with [`Verifier::reset`].
//!
//! Every flow step runs under a [`CancelToken`]. Starting a flow or resetting
//! cancels the previous token, so a stale poll or backend response can never
//! update the model once the user has moved on.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::attribute::CredentialKind;
use crate::error::{Error, Result};
use crate::flow::{Event, FlowStatus, Model, transition};
use crate::poller::{CancelToken, PollConfig, PollOutcome, Poller};
use crate::provider::Backend;
use crate::redirect::{extract_redirect_result, strip_fragment};
use crate::token::{Claims, decode_value};
use crate::types::PresentationResult;
use crate::view::ViewModel;
use crate::wallet::WalletConfig;

/// Drives the licence and credential presentation flows for one page.
#[derive(Debug)]
pub struct Verifier<B> {
    backend: B,
    poller: Poller,
    wallet: WalletConfig,
    model: Mutex<Model>,
    cancel: Mutex<CancelToken>,
}

impl<B: Backend> Verifier<B> {
    /// Create a verifier with default polling and wallet settings.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            poller: Poller::default(),
            wallet: WalletConfig::default(),
            model: Mutex::default(),
            cancel: Mutex::default(),
        }
    }

    /// Use the given polling settings.
    #[must_use]
    pub const fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.poller = Poller::new(config);
        self
    }

    /// Use the given wallet links.
    #[must_use]
    pub fn with_wallet_config(mut self, wallet: WalletConfig) -> Self {
        self.wallet = wallet;
        self
    }

    /// Current step.
    pub fn status(&self) -> FlowStatus {
        self.model().status
    }

    /// Snapshot of the flow state.
    pub fn snapshot(&self) -> Model {
        self.model().clone()
    }

    /// Display projection of the flow state.
    pub fn view(&self) -> ViewModel {
        ViewModel::from(&*self.model())
    }

    /// Handle a page load at `current_url`.
    ///
    /// If the wallet returned a licence response code in the fragment, the
    /// code is removed from the page address, the flow moves to
    /// [`FlowStatus::LicenceFetching`] and the code is exchanged for the
    /// licence result. Returns `true` when a code was consumed.
    ///
    /// # Errors
    ///
    /// Returns an error when the exchange fails; the flow stays in
    /// [`FlowStatus::LicenceFetching`].
    pub async fn load(&self, current_url: &str) -> Result<bool> {
        let Some(code) = extract_redirect_result(current_url) else {
            self.model().address = Some(current_url.to_string());
            return Ok(false);
        };

        let cancel = self.begin(
            Event::LicenceCodeReceived {
                address: strip_fragment(current_url).to_string(),
            },
            "exchange a licence code",
        )?;

        match self.backend.exchange_licence_code(&code).await {
            Ok(result) => {
                self.apply(&cancel, Event::LicenceVerified(result));
                Ok(true)
            }
            Err(e) => Err(self.fail(&cancel, "error fetching licence result", e)),
        }
    }

    /// Start the licence flow: request a presentation and publish the wallet
    /// link for the user to follow.
    ///
    /// # Errors
    ///
    /// Returns an error when the flow has already started or the backend call
    /// fails; in the latter case the flow stays in
    /// [`FlowStatus::LicenceWaiting`].
    pub async fn start_licence_flow(&self) -> Result<()> {
        let cancel = self.begin(Event::LicenceStarted, "start the licence flow")?;

        match self.backend.start_licence_flow().await {
            Ok(url) => {
                let link = self.wallet.wallet_url(CredentialKind::Licence, &url);
                self.apply(&cancel, Event::WalletLinkReady(link));
                Ok(())
            }
            Err(e) => Err(self.fail(&cancel, "error starting licence flow", e)),
        }
    }

    /// Start the credential flow and wait for its outcome.
    ///
    /// Polls until the provider verifies a presentation, the poll budget runs
    /// out, or the flow is reset. On verification each presented token is
    /// decoded; tokens that fail to decode are kept as absent claim sets.
    ///
    /// # Errors
    ///
    /// Returns an error when the licence has not been verified yet, or when a
    /// backend call fails. Failures leave the flow in its current step.
    pub async fn start_credential_flow(&self) -> Result<()> {
        let cancel = {
            let model = self.model();
            if model.status != FlowStatus::LicenceVerified {
                return Err(invalid(model.status, "start the credential flow"));
            }
            self.renew()
        };

        let request = match self.backend.start_credential_flow().await {
            Ok(request) => request,
            Err(e) => return Err(self.fail(&cancel, "error starting credential flow", e)),
        };
        let started = Event::CredentialStarted {
            wallet_url: self.wallet.wallet_url(CredentialKind::Credential, &request.url),
            request_id: request.request_id.clone(),
        };
        if !self.apply(&cancel, started) {
            return Ok(());
        }

        match self.poller.poll(&self.backend, &request.request_id, &cancel).await {
            PollOutcome::Verified(result) => {
                self.apply(&cancel, Event::CredentialVerified(decode_credentials(&result)));
                Ok(())
            }
            PollOutcome::Cancelled => Ok(()),
            PollOutcome::Exhausted => {
                self.apply(&cancel, Event::Failed("no presentation received".into()));
                Ok(())
            }
            PollOutcome::Aborted(e) => {
                self.apply(&cancel, Event::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Abandon any flow in progress and return to [`FlowStatus::NotStarted`].
    ///
    /// A pending poll is cancelled, including one waiting between attempts,
    /// and no further status checks are made for it.
    pub fn reset(&self) {
        let mut model = self.model();
        self.token().cancel();
        model.update(Event::Reset);
    }

    fn model(&self) -> MutexGuard<'_, Model> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn token(&self) -> MutexGuard<'_, CancelToken> {
        self.cancel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Cancel the current step's token and hand out a fresh one.
    fn renew(&self) -> CancelToken {
        let mut token = self.token();
        token.cancel();
        *token = CancelToken::new();
        token.clone()
    }

    // Check that `event` can start a step, then cancel the previous step and
    // apply it under a fresh token.
    fn begin(&self, event: Event, action: &str) -> Result<CancelToken> {
        let mut model = self.model();
        if transition(model.status, &event).is_none() {
            return Err(invalid(model.status, action));
        }
        let cancel = self.renew();
        model.update(event);
        Ok(cancel)
    }

    // Apply `event` unless the step it belongs to has been cancelled. The
    // check runs under the model lock so it cannot race with `reset`.
    fn apply(&self, cancel: &CancelToken, event: Event) -> bool {
        let mut model = self.model();
        if cancel.is_cancelled() {
            tracing::debug!(?event, "dropping event for cancelled step");
            return false;
        }
        model.update(event)
    }

    fn fail(&self, cancel: &CancelToken, context: &str, e: Error) -> Error {
        tracing::error!("{context}: {e}");
        self.apply(cancel, Event::Failed(format!("{context}: {e}")));
        e
    }
}

fn invalid(status: FlowStatus, action: &str) -> Error {
    tracing::warn!(?status, "cannot {action}");
    Error::InvalidState(format!("cannot {action} while {status:?}"))
}

fn decode_credentials(result: &PresentationResult) -> Vec<Option<Claims>> {
    let Some(presentation) = &result.presentation else {
        return Vec::new();
    };
    presentation
        .verifiable_credential
        .iter()
        .map(|token| {
            decode_value(token)
                .inspect_err(|e| tracing::warn!("unable to decode credential: {e}"))
                .ok()
        })
        .collect()
}
