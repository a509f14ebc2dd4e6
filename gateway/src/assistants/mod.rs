//! Client for the remote assistants execution service
//!
//! Raw wire types cover exactly the subset of the upstream schema the
//! gateway consumes. Every discriminated union is an explicit tagged enum
//! with an unsupported catch-all, so new upstream variants degrade to the
//! documented drop behavior instead of failing deserialization.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

pub mod http;

pub use http::HttpAssistantsClient;

// ============================================================================
// Raw Wire Types
// ============================================================================

/// One run step as returned by the upstream step list, newest-first.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRunStep {
    pub id: String,
    pub created_at: i64,
    pub step_details: RawStepDetails,
}

/// Step detail union, discriminated by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawStepDetails {
    MessageCreation {
        message_creation: RawMessageCreation,
    },
    ToolCalls {
        tool_calls: Vec<RawToolCall>,
    },
    /// Any discriminant this gateway does not recognize. Normalizes to an
    /// empty step, which the finalizer prunes.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMessageCreation {
    pub message_id: String,
}

/// Tool call union. Only `code_interpreter` is represented in the client
/// schema; `file_search` and `function` calls produce no items.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawToolCall {
    CodeInterpreter {
        code_interpreter: RawCodeInterpreter,
    },
    FileSearch {},
    Function {},
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCodeInterpreter {
    pub input: String,
    #[serde(default)]
    pub outputs: Vec<RawToolOutput>,
}

/// Code interpreter output union.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawToolOutput {
    Image { image: RawImageFile },
    Logs { logs: String },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawImageFile {
    pub file_id: String,
}

/// A message fetched during normalization of a `message_creation` step.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub content: Vec<RawContentBlock>,
}

/// Message content block union.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawContentBlock {
    Text { text: RawTextBlock },
    ImageFile { image_file: RawImageFile },
    ImageUrl { image_url: RawImageUrl },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTextBlock {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawImageUrl {
    pub url: String,
}

/// Metadata for a generated file artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFileMetadata {
    pub id: String,
    pub filename: String,
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors from the upstream assistants service.
#[derive(Debug, thiserror::Error, Clone)]
pub enum AssistantsError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AssistantsError {
    fn from(e: reqwest::Error) -> Self {
        AssistantsError::Transport(e.to_string())
    }
}

// ============================================================================
// Client Seam
// ============================================================================

/// Abstract operations the gateway consumes from the execution service.
///
/// The HTTP implementation lives in [`http`]; tests substitute a mock.
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    /// Create a new conversation thread, returning its id.
    async fn create_thread(&self) -> Result<String, AssistantsError>;

    /// Append a user message to a thread and start a run for it, returning
    /// the run id.
    async fn create_message_and_run(
        &self,
        thread_id: &str,
        message: &str,
        assistant_id: &str,
    ) -> Result<String, AssistantsError>;

    /// Current status string for a run (`queued`, `in_progress`,
    /// `completed`, `failed`, ...). Passed through to pollers untouched.
    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<String, AssistantsError>;

    /// Raw step list for a run, in upstream order (newest-first).
    async fn list_run_steps(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Vec<RawRunStep>, AssistantsError>;

    /// Fetch one message with its content blocks.
    async fn get_message(
        &self,
        thread_id: &str,
        message_id: &str,
    ) -> Result<RawMessage, AssistantsError>;

    /// Metadata for a file artifact.
    async fn file_metadata(&self, file_id: &str) -> Result<RawFileMetadata, AssistantsError>;

    /// Raw bytes of a file artifact.
    async fn file_bytes(&self, file_id: &str) -> Result<Bytes, AssistantsError>;
}
