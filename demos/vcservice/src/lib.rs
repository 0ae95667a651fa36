//! # Verifier backend service
//!
//! Thin proxy between the verifier front end and the credential-exchange
//! provider. The front end never sees the provider's client credentials; it
//! calls the routes below and the service forwards them.
//!
//! | Route                          | Provider call                       |
//! |--------------------------------|-------------------------------------|
//! | `GET /start-licence-flow`      | create request (licence template)   |
//! | `POST /exchange-licence-code`  | fetch result for a response code    |
//! | `GET /start-credential-flow`   | create request (credential template)|
//! | `POST /check-credential-status`| check request status                |

pub mod config;
pub mod handler;
pub mod provider;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handler::verifier;
use crate::provider::Provider;

/// Shared state for request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Provider API client.
    pub provider: Arc<Provider>,
}

impl AppState {
    /// Create application state from configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            provider: Arc::new(Provider::new(config)),
        }
    }
}

/// Build the service router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_methods(Any).allow_origin(Any).allow_headers(Any);

    Router::new()
        .route("/start-licence-flow", get(verifier::start_licence_flow))
        .route("/exchange-licence-code", post(verifier::exchange_licence_code))
        .route("/start-credential-flow", get(verifier::start_credential_flow))
        .route("/check-credential-status", post(verifier::check_credential_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
