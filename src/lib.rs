//! # Credibil Verify
//!
//! Building blocks for a verifier application that asks a user to present
//! credentials from their wallet: first a mobile driving licence
//! (ISO/IEC 18013-5), then a verifiable credential.
//!
//! Verification itself is delegated to a credential-exchange provider. This
//! crate does not check signatures, schemas or issuer trust; it orchestrates
//! the presentation flows and prepares the provider's results for display.
//!
//! # Design
//!
//! ** Flow State **
//!
//! The [`verifier::Verifier`] owns the state of one page session. Its
//! transitions are pure functions of the current [`flow::FlowStatus`] and a
//! [`flow::Event`], so the flow can be tested without a UI.
//!
//! The licence flow returns through the page URL fragment (see
//! [`redirect`]). The credential flow has no return channel, so the
//! [`poller::Poller`] checks the presentation status until the provider
//! reports it as verified. Polls are bounded and cancellable.
//!
//! ** Provider **
//!
//! The flows reach the backend through the [`provider::Backend`] trait.
//! [`client::HttpBackend`] implements it against the proxy routes served by
//! the `vcservice` demo.
//!
//! # Example
//!
//! See the `demos` directory for the backend proxy service and a terminal
//! client that runs both flows.

pub mod attribute;
pub mod client;
pub mod error;
pub mod flow;
pub mod poller;
pub mod provider;
pub mod redirect;
pub mod token;
pub mod types;
pub mod verifier;
pub mod view;
pub mod wallet;

pub use error::{DecodeError, Error, Result};
pub use verifier::Verifier;
