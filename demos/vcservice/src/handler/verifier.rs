//! # Request handlers for verifier endpoints.

use anyhow::anyhow;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use credibil_verify::types::{
    ExchangeCodeRequest, PresentationRequest, StartLicenceResponse, StatusRequest,
};
use serde_json::Value;

use super::{AppError, AppJson};
use crate::provider::RequestStatus;
use crate::AppState;

// Start a licence (mdoc) presentation.
#[axum::debug_handler]
pub async fn start_licence_flow(
    State(state): State<AppState>,
) -> Result<AppJson<StartLicenceResponse>, AppError> {
    let request = state.provider.request_licence().await?;
    tracing::info!(request_id = %request.request_id, "licence presentation requested");
    Ok(AppJson(StartLicenceResponse { url: request.url }))
}

// Exchange the response code the wallet returned for the licence result.
#[axum::debug_handler]
pub async fn exchange_licence_code(
    State(state): State<AppState>, Json(req): Json<ExchangeCodeRequest>,
) -> Result<AppJson<Value>, AppError> {
    if req.response_code.is_empty() {
        return Err(AppError::Status(StatusCode::BAD_REQUEST, "response_code not found".into()));
    }
    let result = state.provider.result(&req.response_code).await?;
    Ok(AppJson(result))
}

// Start a verifiable credential presentation.
#[axum::debug_handler]
pub async fn start_credential_flow(
    State(state): State<AppState>,
) -> Result<AppJson<PresentationRequest>, AppError> {
    let request = state.provider.request_credential().await?;
    if request.request_id.is_empty() {
        return Err(anyhow!("provider returned no request id").into());
    }
    tracing::info!(request_id = %request.request_id, "credential presentation requested");
    Ok(AppJson(PresentationRequest {
        url: request.url,
        request_id: request.request_id,
    }))
}

// Report the provider's status for a verifiable credential presentation.
#[axum::debug_handler]
pub async fn check_credential_status(
    State(state): State<AppState>, Json(req): Json<StatusRequest>,
) -> Result<AppJson<RequestStatus>, AppError> {
    if req.request_id.is_empty() {
        return Err(AppError::Status(StatusCode::BAD_REQUEST, "request_id not found".into()));
    }
    let status = state.provider.check(&req.request_id).await?;
    tracing::debug!(request_id = %req.request_id, status = %status.status, "presentation status");
    Ok(AppJson(status))
}
