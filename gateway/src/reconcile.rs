//! Run status reconciliation
//!
//! Orchestrates one poll cycle: fetch status and raw steps from the
//! execution service, normalize, and on completion finalize and write
//! through the ledger. Polls before completion are side-effect-free against
//! the store, so in-progress runs always read back with empty steps.

use gateway_types::{NormalizedStep, RunStatus};
use serde::Serialize;

use crate::assistants::{AssistantsApi, AssistantsError};
use crate::ledger::{LedgerError, ThreadLedger};
use crate::normalize::{finalize_steps, normalize_step};

/// Composed failure surface of a reconciliation pass.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Assistants(#[from] AssistantsError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// What a poller sees for a run. `status` is the upstream status string
/// passed through untouched; only `completed` carries steps.
#[derive(Debug, Clone, Serialize)]
pub struct RunView {
    pub run_id: String,
    pub status: String,
    pub steps: Vec<NormalizedStep>,
}

/// Reconcile one run against the execution service.
///
/// A completed status finalizes the normalized steps and writes them into
/// the ledger before returning them; any other status leaves the ledger
/// untouched and returns empty steps. A completed run whose run id is
/// missing from the ledger surfaces [`LedgerError::RunNotFound`].
pub async fn reconcile_run(
    api: &dyn AssistantsApi,
    ledger: &ThreadLedger,
    thread_id: &str,
    run_id: &str,
) -> Result<RunView, GatewayError> {
    let status = api.run_status(thread_id, run_id).await?;
    let raw_steps = api.list_run_steps(thread_id, run_id).await?;

    let mut normalized = Vec::with_capacity(raw_steps.len());
    for raw in raw_steps {
        normalized.push(normalize_step(api, thread_id, raw).await);
    }

    if status != RunStatus::Completed.as_str() {
        tracing::debug!(thread_id, run_id, %status, "Run still pending");
        return Ok(RunView {
            run_id: run_id.to_string(),
            status,
            steps: Vec::new(),
        });
    }

    let finalized = finalize_steps(normalized);
    ledger
        .update_run(thread_id, run_id, finalized.clone(), RunStatus::Completed)
        .await?;
    tracing::info!(
        thread_id,
        run_id,
        step_count = finalized.len(),
        "Run completed and finalized"
    );

    Ok(RunView {
        run_id: run_id.to_string(),
        status,
        steps: finalized,
    })
}
