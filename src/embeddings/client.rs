//! Embedding API clients for various providers

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::Embedder;
use super::EmbeddingConfig;
use super::EmbeddingProvider;
use crate::errors::Result;
use crate::errors::TriageError;
use crate::models::EmbeddingVector;

/// Client for generating embeddings from various providers
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    dimension: usize,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TriageError::HttpError(e.to_string()))?;

        Ok(Self {
            provider: config.provider,
            model: config.model,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            dimension: config.dimension,
            client,
        })
    }

    pub fn from_app_config(config: &crate::config::AppConfig) -> Result<Self> {
        Self::new(EmbeddingConfig::from_app_config(config)?)
    }

    /// Generate embedding for a single text
    pub async fn generate(&self, text: &str) -> Result<EmbeddingVector> {
        let embedding = match self.provider {
            EmbeddingProvider::Sidecar => self.generate_sidecar(text).await?,
            EmbeddingProvider::OpenAI => self.generate_openai(text).await?,
            EmbeddingProvider::Ollama => self.generate_ollama(text).await?,
        };

        if embedding.len() != self.dimension {
            return Err(TriageError::EmbeddingError(format!(
                "expected {} dimensions, provider returned {}",
                self.dimension,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    /// Generate embedding using the standalone embedding service
    async fn generate_sidecar(&self, text: &str) -> Result<EmbeddingVector> {
        #[derive(Serialize)]
        struct SidecarRequest<'a> {
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct SidecarResponse {
            embedding: Vec<f32>,
        }

        debug!("Calling embedding service: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&SidecarRequest { text })
            .send()
            .await?;

        let result: SidecarResponse = Self::parse_response(response, "Embedding service").await?;
        Ok(result.embedding)
    }

    /// Generate embedding using `OpenAI` API
    async fn generate_openai(&self, text: &str) -> Result<EmbeddingVector> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| TriageError::ConfigError("OpenAI API key not provided".to_string()))?;

        #[derive(Serialize)]
        struct OpenAIRequest<'a> {
            input: &'a str,
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling OpenAI embeddings API: {}", url);

        let request = OpenAIRequest {
            input: text,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let result: OpenAIResponse = Self::parse_response(response, "OpenAI API").await?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| TriageError::EmbeddingError("No embedding in response".to_string()))
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<EmbeddingVector> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let result: OllamaResponse = Self::parse_response(response, "Ollama API").await?;
        Ok(result.embedding)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        source: &str,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TriageError::EmbeddingError(format!(
                "{source} error ({status}): {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TriageError::EmbeddingError(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        self.generate(text).await
    }
}
