//! Step normalization and run finalization
//!
//! Converts raw upstream run steps into the compact client schema and, on
//! run completion, deduplicates re-emitted image artifacts across the run's
//! history. Both passes are pure with respect to the ledger; they produce
//! values the reconciler hands to the store.

use std::collections::HashSet;

use gateway_types::{NormalizedStep, StepItem};

use crate::assistants::{
    AssistantsApi, RawContentBlock, RawRunStep, RawStepDetails, RawToolCall, RawToolOutput,
};

// ============================================================================
// Message Content Resolver
// ============================================================================

/// A message content block after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedBlock {
    Text(String),
    /// Image reference, keyed by file id or URL depending on the block type.
    ImageRef(String),
    /// Sentinel for a failed message fetch. Callers record it as a
    /// partial-failure marker instead of aborting the normalization pass.
    Error(String),
}

/// Fetch a message and flatten its content blocks.
///
/// A fetch failure yields a single [`ResolvedBlock::Error`] rather than
/// propagating, so one unreadable message cannot sink the whole step list.
pub async fn resolve_message(
    api: &dyn AssistantsApi,
    thread_id: &str,
    message_id: &str,
) -> Vec<ResolvedBlock> {
    let message = match api.get_message(thread_id, message_id).await {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(
                thread_id,
                message_id,
                error = %e,
                "Failed to resolve message content"
            );
            return vec![ResolvedBlock::Error(e.to_string())];
        }
    };

    message
        .content
        .into_iter()
        .filter_map(|block| match block {
            RawContentBlock::Text { text } => Some(ResolvedBlock::Text(text.value)),
            RawContentBlock::ImageFile { image_file } => {
                Some(ResolvedBlock::ImageRef(image_file.file_id))
            }
            RawContentBlock::ImageUrl { image_url } => Some(ResolvedBlock::ImageRef(image_url.url)),
            RawContentBlock::Unsupported => None,
        })
        .collect()
}

// ============================================================================
// Step Normalizer
// ============================================================================

/// Normalize one raw run step into the compact client schema.
///
/// Unrecognized step discriminants produce an empty item list; the finalizer
/// prunes those steps. `file_search` and `function` tool calls are
/// deliberately dropped as well.
pub async fn normalize_step(
    api: &dyn AssistantsApi,
    thread_id: &str,
    raw: RawRunStep,
) -> NormalizedStep {
    let mut items = Vec::new();

    match raw.step_details {
        RawStepDetails::MessageCreation { message_creation } => {
            for block in resolve_message(api, thread_id, &message_creation.message_id).await {
                match block {
                    ResolvedBlock::Text(value) => items.push(StepItem::Text(value)),
                    ResolvedBlock::ImageRef(id) => items.push(StepItem::Image(id)),
                    // Text is the only lossless carrier for the sentinel in
                    // the three-kind item schema.
                    ResolvedBlock::Error(message) => items.push(StepItem::Text(message)),
                }
            }
        }
        RawStepDetails::ToolCalls { tool_calls } => {
            for call in tool_calls {
                match call {
                    RawToolCall::CodeInterpreter { code_interpreter } => {
                        items.push(StepItem::Code(code_interpreter.input));
                        for output in code_interpreter.outputs {
                            if let RawToolOutput::Image { image } = output {
                                items.push(StepItem::Image(image.file_id));
                            }
                        }
                    }
                    RawToolCall::FileSearch {}
                    | RawToolCall::Function {}
                    | RawToolCall::Unsupported => {}
                }
            }
        }
        RawStepDetails::Unsupported => {
            tracing::debug!(step_id = %raw.id, "Skipping unsupported step type");
        }
    }

    NormalizedStep {
        id: raw.id,
        created_at: raw.created_at,
        items,
    }
}

// ============================================================================
// Artifact Deduplicator / Run Finalizer
// ============================================================================

/// Produce the step list to persist for a completed run.
///
/// Takes the normalized steps in upstream order (newest-first), reverses to
/// chronological order, drops every image item whose artifact id was already
/// seen earlier in the run, and prunes steps left with no items. Pure, so
/// re-finalizing the same input yields identical output.
pub fn finalize_steps(mut steps: Vec<NormalizedStep>) -> Vec<NormalizedStep> {
    steps.reverse();

    let mut seen_artifacts: HashSet<String> = HashSet::new();
    let mut finalized = Vec::with_capacity(steps.len());

    for mut step in steps {
        step.items.retain(|item| match item.artifact_id() {
            Some(id) => seen_artifacts.insert(id.to_string()),
            None => true,
        });
        if !step.items.is_empty() {
            finalized.push(step);
        }
    }

    finalized
}
