//! Client-facing schema for the assistant gateway
//!
//! These types are the stable contract between the gateway and its clients:
//! the compact step schema returned by the run endpoint and the exchange
//! records persisted in the thread ledger. Raw wire types from the upstream
//! assistants service never leave the `gateway` crate; everything here is
//! the normalized form.

use serde::{Deserialize, Serialize};

// ============================================================================
// Run Status
// ============================================================================

/// Stored run status. Transitions only in_progress -> completed, at most
/// once per run; the ledger enforces this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    InProgress,
    Completed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::InProgress => "in_progress",
            RunStatus::Completed => "completed",
        }
    }
}

// ============================================================================
// Normalized Steps
// ============================================================================

/// One item within a normalized run step.
///
/// Serializes as `{"type": "text"|"code"|"image", "content": "..."}`. For
/// `image` the content is the opaque artifact identifier the dedup pass
/// keys on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum StepItem {
    Text(String),
    Code(String),
    Image(String),
}

impl StepItem {
    /// Artifact identifier, for image items only.
    pub fn artifact_id(&self) -> Option<&str> {
        match self {
            StepItem::Image(id) => Some(id),
            _ => None,
        }
    }
}

/// One run step in the compact client schema.
///
/// `id` and `created_at` are copied verbatim from the upstream step record.
/// The item list serializes under the wire name `steps` for compatibility
/// with the persisted ledger layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedStep {
    pub id: String,
    pub created_at: i64,
    #[serde(rename = "steps")]
    pub items: Vec<StepItem>,
}

// ============================================================================
// Exchanges
// ============================================================================

/// The server half of an exchange: one run and its finalized steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerRunRecord {
    pub run_id: String,
    pub status: RunStatus,
    pub steps: Vec<NormalizedStep>,
}

impl ServerRunRecord {
    /// A freshly submitted run: in progress, no steps yet.
    pub fn in_progress(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            status: RunStatus::InProgress,
            steps: Vec::new(),
        }
    }
}

/// The client half of an exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientMessage {
    pub message: String,
}

/// One user message paired with its server-side run record. Immutable after
/// append except for `server`, which is finalized exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exchange {
    pub client: ClientMessage,
    pub server: ServerRunRecord,
}

impl Exchange {
    pub fn new(message: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            client: ClientMessage {
                message: message.into(),
            },
            server: ServerRunRecord::in_progress(run_id),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
