//! Thread ledger store
//!
//! One JSON document on disk mapping thread id to its ordered exchange log.
//! Every mutation is a full read-modify-write of the document, serialized by
//! an async mutex (the whole store is a single document, so store-level
//! locking also covers concurrent writers to different threads). Writes go
//! through a temp file and rename, so readers never observe a torn document
//! and `load` does not need the write lock.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gateway_types::{Exchange, NormalizedStep, RunStatus};
use tokio::sync::Mutex;

type LedgerDocument = BTreeMap<String, Vec<Exchange>>;

/// Errors from the ledger store.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Ledger I/O error: {0}")]
    Io(String),

    #[error("Ledger serialization error: {0}")]
    Serialization(String),

    /// The run was never appended, or an append was lost. Indicates a
    /// ledger inconsistency the caller must surface, never swallow.
    #[error("Run {run_id} not found in ledger for thread {thread_id}")]
    RunNotFound { thread_id: String, run_id: String },

    /// A completed run can never move back to in_progress.
    #[error("Run {run_id} is already completed; refusing backward status transition")]
    InvalidTransition { run_id: String },
}

impl From<std::io::Error> for LedgerError {
    fn from(e: std::io::Error) -> Self {
        LedgerError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}

/// Durable per-thread exchange log. Constructed once at startup and passed
/// down as a handle; there is no ambient global store.
pub struct ThreadLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ThreadLedger {
    /// Open the ledger at `path`, creating an empty document (and parent
    /// directories) if none exists yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        if tokio::fs::try_exists(&path).await? {
            // Validate the existing document up front so a corrupt file
            // fails at startup, not on the first request.
            let bytes = tokio::fs::read(&path).await?;
            let _: LedgerDocument = serde_json::from_slice(&bytes)?;
        } else {
            write_atomic(&path, &LedgerDocument::new()).await?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Append one exchange to a thread's log, creating the thread entry if
    /// absent. Existing entries are never reordered or removed.
    pub async fn append(&self, thread_id: &str, exchange: Exchange) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document
            .entry(thread_id.to_string())
            .or_default()
            .push(exchange);
        write_atomic(&self.path, &document).await
    }

    /// Replace the steps and status of the exchange whose run id matches.
    ///
    /// Returns [`LedgerError::RunNotFound`] when no exchange in the thread
    /// carries `run_id`, and [`LedgerError::InvalidTransition`] when the
    /// stored status is already `completed` and the new one is not.
    pub async fn update_run(
        &self,
        thread_id: &str,
        run_id: &str,
        steps: Vec<NormalizedStep>,
        status: RunStatus,
    ) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;

        let exchange = document
            .get_mut(thread_id)
            .and_then(|log| log.iter_mut().find(|e| e.server.run_id == run_id))
            .ok_or_else(|| LedgerError::RunNotFound {
                thread_id: thread_id.to_string(),
                run_id: run_id.to_string(),
            })?;

        if exchange.server.status == RunStatus::Completed && status != RunStatus::Completed {
            return Err(LedgerError::InvalidTransition {
                run_id: run_id.to_string(),
            });
        }

        exchange.server.steps = steps;
        exchange.server.status = status;
        write_atomic(&self.path, &document).await
    }

    /// Full ordered log for a thread; empty for unknown thread ids.
    pub async fn load(&self, thread_id: &str) -> Result<Vec<Exchange>, LedgerError> {
        let document = self.read_document().await?;
        Ok(document.get(thread_id).cloned().unwrap_or_default())
    }

    async fn read_document(&self) -> Result<LedgerDocument, LedgerError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(LedgerDocument::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn write_atomic(path: &Path, document: &LedgerDocument) -> Result<(), LedgerError> {
    let bytes = serde_json::to_vec_pretty(document)?;
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &bytes).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}
