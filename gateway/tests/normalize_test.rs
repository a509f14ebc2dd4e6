//! Step normalization tests
//!
//! Covers the raw-step to compact-schema transform: content resolution,
//! tool-call mapping, deliberate drops, and the partial-failure sentinel.

mod common;

use common::{code_interpreter_step, message_creation_step, MockAssistants};
use gateway::normalize::{normalize_step, resolve_message, ResolvedBlock};
use gateway_types::StepItem;
use serde_json::json;

async fn normalize(mock: &MockAssistants, raw: serde_json::Value) -> gateway_types::NormalizedStep {
    let step = serde_json::from_value(raw).expect("invalid raw step fixture");
    normalize_step(mock, "thread_test", step).await
}

#[tokio::test]
async fn test_message_creation_text_block() {
    let mock = MockAssistants::new();
    mock.put_message("msg_1", common::text_message("msg_1", "hello there"));

    let step = normalize(&mock, message_creation_step("step_1", 100, "msg_1")).await;

    assert_eq!(step.id, "step_1");
    assert_eq!(step.created_at, 100);
    assert_eq!(step.items, vec![StepItem::Text("hello there".to_string())]);
}

#[tokio::test]
async fn test_message_creation_image_blocks() {
    let mock = MockAssistants::new();
    mock.put_message(
        "msg_1",
        json!({
            "id": "msg_1",
            "content": [
                {"type": "text", "text": {"value": "see below", "annotations": []}},
                {"type": "image_file", "image_file": {"file_id": "file-abc"}},
                {"type": "image_url", "image_url": {"url": "https://example.com/x.png"}}
            ]
        }),
    );

    let step = normalize(&mock, message_creation_step("step_1", 100, "msg_1")).await;

    assert_eq!(
        step.items,
        vec![
            StepItem::Text("see below".to_string()),
            StepItem::Image("file-abc".to_string()),
            StepItem::Image("https://example.com/x.png".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_code_interpreter_emits_code_then_images() {
    let mock = MockAssistants::new();

    let step = normalize(
        &mock,
        code_interpreter_step("step_1", 100, "import matplotlib", &["file-1", "file-2"]),
    )
    .await;

    assert_eq!(
        step.items,
        vec![
            StepItem::Code("import matplotlib".to_string()),
            StepItem::Image("file-1".to_string()),
            StepItem::Image("file-2".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_code_interpreter_log_outputs_produce_no_items() {
    let mock = MockAssistants::new();

    let step = normalize(
        &mock,
        json!({
            "id": "step_1",
            "created_at": 100,
            "step_details": {
                "type": "tool_calls",
                "tool_calls": [{
                    "type": "code_interpreter",
                    "code_interpreter": {
                        "input": "print(1)",
                        "outputs": [{"type": "logs", "logs": "1\n"}]
                    }
                }]
            }
        }),
    )
    .await;

    // The code input is kept; log outputs are not represented.
    assert_eq!(step.items, vec![StepItem::Code("print(1)".to_string())]);
}

#[tokio::test]
async fn test_file_search_and_function_calls_are_dropped() {
    let mock = MockAssistants::new();

    let step = normalize(
        &mock,
        json!({
            "id": "step_1",
            "created_at": 100,
            "step_details": {
                "type": "tool_calls",
                "tool_calls": [
                    {"type": "file_search", "file_search": {}},
                    {"type": "function", "function": {"name": "f", "arguments": "{}"}}
                ]
            }
        }),
    )
    .await;

    assert!(step.items.is_empty());
}

#[tokio::test]
async fn test_unsupported_step_type_normalizes_to_empty() {
    let mock = MockAssistants::new();

    let step = normalize(
        &mock,
        json!({
            "id": "step_1",
            "created_at": 100,
            "step_details": {"type": "retrieval"}
        }),
    )
    .await;

    assert_eq!(step.id, "step_1");
    assert!(step.items.is_empty());
}

#[tokio::test]
async fn test_unsupported_content_blocks_resolve_to_nothing() {
    let mock = MockAssistants::new();
    mock.put_message(
        "msg_1",
        json!({
            "id": "msg_1",
            "content": [
                {"type": "refusal", "refusal": "no"},
                {"type": "text", "text": {"value": "but this", "annotations": []}}
            ]
        }),
    );

    let step = normalize(&mock, message_creation_step("step_1", 100, "msg_1")).await;
    assert_eq!(step.items, vec![StepItem::Text("but this".to_string())]);
}

#[tokio::test]
async fn test_message_fetch_failure_becomes_sentinel_item() {
    let mock = MockAssistants::new();
    mock.fail_message_fetches();

    let blocks = resolve_message(&mock, "thread_test", "msg_1").await;
    assert_eq!(blocks.len(), 1);
    assert!(matches!(blocks[0], ResolvedBlock::Error(_)));

    // The normalizer carries the sentinel into the step as a text item
    // instead of failing the pass.
    let step = normalize(&mock, message_creation_step("step_1", 100, "msg_1")).await;
    assert_eq!(step.items.len(), 1);
    match &step.items[0] {
        StepItem::Text(message) => assert!(message.contains("msg_1")),
        other => panic!("expected text sentinel, got {other:?}"),
    }
}
