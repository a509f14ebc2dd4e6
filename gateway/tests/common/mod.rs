//! Shared test fixtures: a scriptable in-memory assistants client.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use gateway::assistants::{
    AssistantsApi, AssistantsError, RawFileMetadata, RawMessage, RawRunStep,
};

/// Scriptable stand-in for the remote execution service.
///
/// Raw steps and messages are stored as JSON values and deserialized on
/// access, so tests exercise the same wire shapes the HTTP client would.
pub struct MockAssistants {
    pub status: Mutex<String>,
    pub raw_steps: Mutex<Vec<serde_json::Value>>,
    pub messages: Mutex<HashMap<String, serde_json::Value>>,
    pub files: Mutex<HashMap<String, (String, Vec<u8>)>>,
    pub fail_message_fetch: Mutex<bool>,
}

impl MockAssistants {
    pub fn new() -> Self {
        Self {
            status: Mutex::new("in_progress".to_string()),
            raw_steps: Mutex::new(Vec::new()),
            messages: Mutex::new(HashMap::new()),
            files: Mutex::new(HashMap::new()),
            fail_message_fetch: Mutex::new(false),
        }
    }

    pub fn set_status(&self, status: &str) {
        *self.status.lock().unwrap() = status.to_string();
    }

    /// Steps are stored in upstream order: newest-first.
    pub fn set_raw_steps(&self, steps: Vec<serde_json::Value>) {
        *self.raw_steps.lock().unwrap() = steps;
    }

    pub fn put_message(&self, message_id: &str, message: serde_json::Value) {
        self.messages
            .lock()
            .unwrap()
            .insert(message_id.to_string(), message);
    }

    pub fn put_file(&self, file_id: &str, filename: &str, bytes: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(file_id.to_string(), (filename.to_string(), bytes.to_vec()));
    }

    pub fn fail_message_fetches(&self) {
        *self.fail_message_fetch.lock().unwrap() = true;
    }
}

#[async_trait]
impl AssistantsApi for MockAssistants {
    async fn create_thread(&self) -> Result<String, AssistantsError> {
        Ok("thread_test".to_string())
    }

    async fn create_message_and_run(
        &self,
        _thread_id: &str,
        _message: &str,
        _assistant_id: &str,
    ) -> Result<String, AssistantsError> {
        Ok("run_test".to_string())
    }

    async fn run_status(&self, _thread_id: &str, _run_id: &str) -> Result<String, AssistantsError> {
        Ok(self.status.lock().unwrap().clone())
    }

    async fn list_run_steps(
        &self,
        _thread_id: &str,
        _run_id: &str,
    ) -> Result<Vec<RawRunStep>, AssistantsError> {
        self.raw_steps
            .lock()
            .unwrap()
            .iter()
            .map(|value| {
                serde_json::from_value(value.clone())
                    .map_err(|e| AssistantsError::Decode(e.to_string()))
            })
            .collect()
    }

    async fn get_message(
        &self,
        _thread_id: &str,
        message_id: &str,
    ) -> Result<RawMessage, AssistantsError> {
        if *self.fail_message_fetch.lock().unwrap() {
            return Err(AssistantsError::Upstream {
                status: 404,
                message: format!("No message found with id '{message_id}'"),
            });
        }
        let messages = self.messages.lock().unwrap();
        let value = messages.get(message_id).ok_or(AssistantsError::Upstream {
            status: 404,
            message: format!("No message found with id '{message_id}'"),
        })?;
        serde_json::from_value(value.clone()).map_err(|e| AssistantsError::Decode(e.to_string()))
    }

    async fn file_metadata(&self, file_id: &str) -> Result<RawFileMetadata, AssistantsError> {
        let files = self.files.lock().unwrap();
        let (filename, _) = files.get(file_id).ok_or(AssistantsError::Upstream {
            status: 404,
            message: format!("No file found with id '{file_id}'"),
        })?;
        serde_json::from_value(serde_json::json!({"id": file_id, "filename": filename}))
            .map_err(|e| AssistantsError::Decode(e.to_string()))
    }

    async fn file_bytes(&self, file_id: &str) -> Result<Bytes, AssistantsError> {
        let files = self.files.lock().unwrap();
        let (_, bytes) = files.get(file_id).ok_or(AssistantsError::Upstream {
            status: 404,
            message: format!("No file found with id '{file_id}'"),
        })?;
        Ok(Bytes::from(bytes.clone()))
    }
}

/// A `message_creation` raw step in wire form.
pub fn message_creation_step(id: &str, created_at: i64, message_id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "created_at": created_at,
        "step_details": {
            "type": "message_creation",
            "message_creation": {"message_id": message_id}
        }
    })
}

/// A `tool_calls` raw step with one code interpreter call in wire form.
pub fn code_interpreter_step(
    id: &str,
    created_at: i64,
    input: &str,
    image_file_ids: &[&str],
) -> serde_json::Value {
    let outputs: Vec<serde_json::Value> = image_file_ids
        .iter()
        .map(|file_id| serde_json::json!({"type": "image", "image": {"file_id": file_id}}))
        .collect();
    serde_json::json!({
        "id": id,
        "created_at": created_at,
        "step_details": {
            "type": "tool_calls",
            "tool_calls": [{
                "type": "code_interpreter",
                "code_interpreter": {"input": input, "outputs": outputs}
            }]
        }
    })
}

/// A message with a single text block in wire form.
pub fn text_message(message_id: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": message_id,
        "content": [{"type": "text", "text": {"value": text, "annotations": []}}]
    })
}
