//! HTTP API routes for the assistant gateway
//!
//! Thin plumbing over the core: handlers validate input, call the
//! assistants client / reconciler / ledger, and map domain errors onto a
//! machine-readable JSON error envelope.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

pub mod files;
pub mod runs;
pub mod threads;

use crate::app_state::AppState;
use crate::assistants::AssistantsError;
use crate::ledger::LedgerError;
use crate::reconcile::GatewayError;

/// Error codes for machine-readable error responses
#[derive(Debug, Clone)]
pub enum ApiErrorCode {
    Validation,
    UpstreamFailure,
    RunNotFound,
    Conflict,
    InternalError,
}

impl ApiErrorCode {
    fn as_str(&self) -> &'static str {
        match self {
            ApiErrorCode::Validation => "VALIDATION",
            ApiErrorCode::UpstreamFailure => "UPSTREAM_FAILURE",
            ApiErrorCode::RunNotFound => "RUN_NOT_FOUND",
            ApiErrorCode::Conflict => "CONFLICT",
            ApiErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiErrorCode::Validation => StatusCode::BAD_REQUEST,
            ApiErrorCode::UpstreamFailure => StatusCode::BAD_GATEWAY,
            ApiErrorCode::RunNotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::Conflict => StatusCode::CONFLICT,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    code: String,
    message: String,
}

/// Create an error response
pub(crate) fn api_error(code: ApiErrorCode, message: impl Into<String>) -> axum::response::Response {
    let status = code.status_code();
    let body = Json(ApiErrorResponse {
        error: ApiErrorDetail {
            code: code.as_str().to_string(),
            message: message.into(),
        },
    });
    (status, body).into_response()
}

/// Map a domain error onto the envelope. Upstream failures carry the
/// upstream message through; ledger inconsistencies are reported, never
/// swallowed.
pub(crate) fn gateway_error(error: GatewayError) -> axum::response::Response {
    match error {
        GatewayError::Assistants(e) => assistants_error(e),
        GatewayError::Ledger(e) => ledger_error(e),
    }
}

pub(crate) fn assistants_error(error: AssistantsError) -> axum::response::Response {
    api_error(ApiErrorCode::UpstreamFailure, error.to_string())
}

pub(crate) fn ledger_error(error: LedgerError) -> axum::response::Response {
    match error {
        LedgerError::RunNotFound { .. } => api_error(ApiErrorCode::RunNotFound, error.to_string()),
        LedgerError::InvalidTransition { .. } => api_error(ApiErrorCode::Conflict, error.to_string()),
        LedgerError::Io(_) | LedgerError::Serialization(_) => {
            api_error(ApiErrorCode::InternalError, error.to_string())
        }
    }
}

/// Configure all API routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        // Thread routes
        .route("/threads", post(threads::create_thread))
        .route("/threads/{thread_id}/messages", post(threads::add_message))
        .route("/threads/{thread_id}/exchanges", get(threads::get_exchanges))
        // Run routes
        .route("/threads/{thread_id}/runs/{run_id}", get(runs::get_run))
        // File routes
        .route("/files/{file_id}", get(files::get_file))
}

/// Health check endpoint
pub async fn health_check(State(_state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "assistant-gateway",
            "version": "0.1.0"
        })),
    )
}
