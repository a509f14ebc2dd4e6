//! Thread endpoints: create, submit a message, read the persisted log.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{api_error, assistants_error, ledger_error, ApiErrorCode};
use crate::app_state::AppState;
use gateway_types::Exchange;

/// Create a new thread on the execution service.
pub async fn create_thread(State(state): State<AppState>) -> impl IntoResponse {
    match state.api().create_thread().await {
        Ok(thread_id) => {
            tracing::info!(%thread_id, "Created thread");
            (StatusCode::OK, Json(json!({"thread_id": thread_id}))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create thread");
            assistants_error(e)
        }
    }
}

/// Request to add a message and start a run
#[derive(Debug, Deserialize)]
pub struct AddMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub assistant_id: Option<String>,
}

/// Response after starting a run
#[derive(Debug, Serialize)]
pub struct AddMessageResponse {
    pub run_id: String,
}

/// Submit a user message to a thread and start a run for it.
///
/// Appends the in-progress exchange to the ledger before returning, so the
/// run is pollable immediately. Validation failures are rejected before any
/// upstream call.
pub async fn add_message(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    Json(req): Json<AddMessageRequest>,
) -> impl IntoResponse {
    let message = match req.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => return api_error(ApiErrorCode::Validation, "message is required"),
    };
    let assistant_id = match req.assistant_id.as_deref().map(str::trim) {
        Some(assistant_id) if !assistant_id.is_empty() => assistant_id.to_string(),
        _ => return api_error(ApiErrorCode::Validation, "assistant_id is required"),
    };

    tracing::info!(%thread_id, "Adding message to thread");

    let run_id = match state
        .api()
        .create_message_and_run(&thread_id, &message, &assistant_id)
        .await
    {
        Ok(run_id) => run_id,
        Err(e) => {
            tracing::error!(%thread_id, error = %e, "Failed to start run");
            return assistants_error(e);
        }
    };

    let exchange = Exchange::new(message, run_id.clone());
    if let Err(e) = state.ledger().append(&thread_id, exchange).await {
        tracing::error!(%thread_id, %run_id, error = %e, "Failed to append exchange");
        return ledger_error(e);
    }

    tracing::info!(%thread_id, %run_id, "Created run");
    (StatusCode::OK, Json(AddMessageResponse { run_id })).into_response()
}

/// Full persisted exchange log for a thread. Unknown threads read back as
/// an empty log.
pub async fn get_exchanges(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> impl IntoResponse {
    match state.ledger().load(&thread_id).await {
        Ok(exchanges) => (
            StatusCode::OK,
            Json(json!({"thread_id": thread_id, "exchanges": exchanges})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(%thread_id, error = %e, "Failed to load thread log");
            ledger_error(e)
        }
    }
}
