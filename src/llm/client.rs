//! OpenAI-compatible chat completions client (OpenRouter, OpenAI, vLLM, Ollama `/v1`)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::ChatMessage;
use super::ChatModel;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::errors::TriageError;

/// Chat client holding the model parameters used for every request
#[derive(Clone)]
pub struct LlmService {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: Client,
}

impl LlmService {
    /// Create the service from application config
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_params(
            config.llm_endpoint(),
            config.llm_key(),
            config.llm_model(),
            config.llm.temperature,
            config.llm.max_tokens,
            Duration::from_secs(config.llm.timeout_secs),
        )
    }

    pub fn with_params(
        endpoint: &str,
        api_key: &str,
        model: &str,
        temperature: f32,
        max_tokens: usize,
        timeout: Duration,
    ) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(TriageError::ConfigError("missing LLM model name".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TriageError::HttpError(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            temperature,
            max_tokens,
            client,
        })
    }
}

#[async_trait]
impl ChatModel for LlmService {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling chat completions: {} ({})", url, self.model);

        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages,
        };

        let mut request = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| TriageError::LlmError(format!("failed to call chat completions: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(TriageError::LlmError(format!(
                "LLM returned {status}: {text}"
            )));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| TriageError::LlmError(format!("failed to parse LLM response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| TriageError::LlmError("LLM response had no content".to_string()))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: usize,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::header;
    use wiremock::matchers::method;
    use wiremock::matchers::path;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;

    use super::*;

    fn service(endpoint: &str, key: &str) -> LlmService {
        LlmService::with_params(
            endpoint,
            key,
            "test/model",
            0.2,
            64,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_trimmed_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "  Yes \n" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let llm = service(&server.uri(), "key-123");
        assert_eq!(llm.complete("Is this a greeting?").await.unwrap(), "Yes");
    }

    #[tokio::test]
    async fn test_request_body_carries_model_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "ok" } }]
            })))
            .mount(&server)
            .await;

        let llm = service(&server.uri(), "");
        llm.chat(&[ChatMessage::system("sys"), ChatMessage::user("hi")])
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "test/model");
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_llm_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = service(&server.uri(), "k").complete("x").await.unwrap_err();
        assert!(matches!(err, TriageError::LlmError(ref m) if m.contains("rate limited")));
    }

    #[tokio::test]
    async fn test_empty_choices_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        assert!(service(&server.uri(), "k").complete("x").await.is_err());
    }

    #[test]
    fn test_missing_model_rejected() {
        let result = LlmService::with_params("http://x", "", " ", 1.0, 10, Duration::from_secs(1));
        assert!(matches!(result, Err(TriageError::ConfigError(_))));
    }
}
