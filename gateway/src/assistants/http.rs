//! HTTP implementation of [`AssistantsApi`] over the assistants v2 REST API.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use super::{AssistantsApi, AssistantsError, RawFileMetadata, RawMessage, RawRunStep};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Assistants client backed by `reqwest`.
pub struct HttpAssistantsClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

impl HttpAssistantsClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, AssistantsError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .build()
            .map_err(|e| AssistantsError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
    }

    /// Map a non-success response into an upstream error carrying the body
    /// message, then decode the success body as JSON.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AssistantsError> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AssistantsError::Decode(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AssistantsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(AssistantsError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AssistantsApi for HttpAssistantsClient {
    async fn create_thread(&self) -> Result<String, AssistantsError> {
        let response = self
            .request(reqwest::Method::POST, "/threads")
            .json(&json!({}))
            .send()
            .await?;
        let thread: IdResponse = Self::decode(response).await?;
        Ok(thread.id)
    }

    async fn create_message_and_run(
        &self,
        thread_id: &str,
        message: &str,
        assistant_id: &str,
    ) -> Result<String, AssistantsError> {
        let response = self
            .request(reqwest::Method::POST, &format!("/threads/{thread_id}/messages"))
            .json(&json!({"role": "user", "content": message}))
            .send()
            .await?;
        let _message: IdResponse = Self::decode(response).await?;

        let response = self
            .request(reqwest::Method::POST, &format!("/threads/{thread_id}/runs"))
            .json(&json!({"assistant_id": assistant_id}))
            .send()
            .await?;
        let run: RunResponse = Self::decode(response).await?;
        Ok(run.id)
    }

    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<String, AssistantsError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/threads/{thread_id}/runs/{run_id}"),
            )
            .send()
            .await?;
        let run: RunResponse = Self::decode(response).await?;
        Ok(run.status)
    }

    async fn list_run_steps(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Vec<RawRunStep>, AssistantsError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/threads/{thread_id}/runs/{run_id}/steps"),
            )
            .send()
            .await?;
        let steps: ListResponse<RawRunStep> = Self::decode(response).await?;
        Ok(steps.data)
    }

    async fn get_message(
        &self,
        thread_id: &str,
        message_id: &str,
    ) -> Result<RawMessage, AssistantsError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/threads/{thread_id}/messages/{message_id}"),
            )
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn file_metadata(&self, file_id: &str) -> Result<RawFileMetadata, AssistantsError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/files/{file_id}"))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn file_bytes(&self, file_id: &str) -> Result<Bytes, AssistantsError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/files/{file_id}/content"))
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?)
    }
}
