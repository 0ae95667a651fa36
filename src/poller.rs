//! # Presentation Poller
//!
//! The credential flow has no return channel from the wallet: the verifier
//! learns about a presentation by repeatedly asking the backend for the
//! status of the request until the provider reports it as verified.
//!
//! Polling is bounded by [`PollConfig::max_attempts`] and can be stopped at
//! any point, including while waiting between attempts, through a
//! [`CancelToken`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::Error;
use crate::provider::Backend;
use crate::types::PresentationResult;

/// Delay between status checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Default number of status checks before giving up (five minutes at the
/// default interval).
pub const MAX_ATTEMPTS: u32 = 300;

/// Poller settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status checks.
    pub interval: Duration,

    /// Maximum number of status checks. `None` polls until cancelled.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: Some(MAX_ATTEMPTS),
        }
    }
}

/// How a poll ended.
#[derive(Debug)]
pub enum PollOutcome {
    /// The provider verified a presentation.
    Verified(PresentationResult),

    /// The poll was cancelled before a result arrived.
    Cancelled,

    /// A status check failed. The error has already been logged.
    Aborted(Error),

    /// The attempt budget ran out without a terminal status.
    Exhausted,
}

/// Cooperative cancellation shared between a flow and its poll.
///
/// Clones observe the same state. Once cancelled a token stays cancelled; a
/// new flow takes a new token.
#[derive(Clone, Debug)]
pub struct CancelToken {
    inner: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// Create an active (not cancelled) token.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { inner: Arc::new(tx) }
    }

    /// Cancel the token, waking every pending [`CancelToken::cancelled`].
    pub fn cancel(&self) {
        self.inner.send_replace(true);
    }

    /// Whether the token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.inner.borrow()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.inner.subscribe();
        // the sender is owned by `self`, so the channel cannot close here
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Polls the backend for the outcome of a credential presentation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Poller {
    config: PollConfig,
}

impl Poller {
    /// Create a poller with the given settings.
    #[must_use]
    pub const fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// The poller's settings.
    #[must_use]
    pub const fn config(&self) -> PollConfig {
        self.config
    }

    /// Check the status of `request_id` until it is verified, a check fails,
    /// the attempt budget is spent, or `cancel` fires.
    ///
    /// Non-terminal statuses (such as `initiated`) are followed by a wait of
    /// [`PollConfig::interval`] before the next check.
    pub async fn poll(
        &self, backend: &impl Backend, request_id: &str, cancel: &CancelToken,
    ) -> PollOutcome {
        let mut attempt = 0_u32;

        loop {
            if self.config.max_attempts.is_some_and(|max| attempt >= max) {
                tracing::warn!(request_id, attempt, "giving up on presentation");
                return PollOutcome::Exhausted;
            }
            if attempt > 0 {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return PollOutcome::Cancelled,
                    () = tokio::time::sleep(self.config.interval) => {}
                }
            }
            if cancel.is_cancelled() {
                return PollOutcome::Cancelled;
            }
            attempt += 1;
            tracing::debug!(request_id, attempt, "checking presentation status");

            let checked = tokio::select! {
                biased;
                () = cancel.cancelled() => return PollOutcome::Cancelled,
                checked = backend.check_credential_status(request_id) => checked,
            };
            match checked {
                Ok(result) if result.status.is_terminal() => {
                    tracing::info!(request_id, attempt, "presentation verified");
                    return PollOutcome::Verified(result);
                }
                Ok(result) => {
                    tracing::debug!(request_id, status = %result.status, "presentation pending");
                }
                Err(e) => {
                    tracing::error!(request_id, "error during status check: {e}");
                    return PollOutcome::Aborted(e);
                }
            }
        }
    }
}
