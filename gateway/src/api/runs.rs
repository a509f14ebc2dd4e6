//! Run polling endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::gateway_error;
use crate::app_state::AppState;
use crate::reconcile::reconcile_run;

/// Poll a run. Steps are empty unless the upstream status is `completed`,
/// in which case the finalized steps are written to the ledger and returned.
pub async fn get_run(
    State(state): State<AppState>,
    Path((thread_id, run_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match reconcile_run(state.api(), state.ledger(), &thread_id, &run_id).await {
        Ok(view) => {
            tracing::info!(%thread_id, %run_id, status = %view.status, "Retrieved run");
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(e) => {
            tracing::error!(%thread_id, %run_id, error = %e, "Failed to reconcile run");
            gateway_error(e)
        }
    }
}
