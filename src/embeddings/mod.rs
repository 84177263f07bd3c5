//! Embeddings generation module
//!
//! Ticket text is turned into vectors by an external provider:
//! - a sidecar service (`POST {text}` → `{embedding}`), the default
//! - OpenAI-compatible `/embeddings`
//! - Ollama `/api/embeddings`
//!
//! # Examples
//!
//! ```rust,no_run
//! use ticket_triage::config::AppConfig;
//! use ticket_triage::embeddings::{Embedder, EmbeddingClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::from_app_config(&config)?;
//!
//!     let embedding = client.embed("My booking reference does not work").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;

use std::str::FromStr;

use async_trait::async_trait;

pub use client::EmbeddingClient;

use crate::errors::Result;
use crate::errors::TriageError;
use crate::models::EmbeddingVector;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// Standalone embedding service taking `{text}` and returning `{embedding}`
    Sidecar,
    /// `OpenAI` embeddings API
    OpenAI,
    /// Ollama local embeddings
    Ollama,
}

impl FromStr for EmbeddingProvider {
    type Err = TriageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sidecar" | "local" => Ok(Self::Sidecar),
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(TriageError::ConfigError(format!(
                "unknown embedding provider: {other}"
            ))),
        }
    }
}

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Result<Self> {
        Ok(Self {
            provider: config.embedding_provider()?,
            model: config.embeddings.model.clone(),
            dimension: config.embedding_dimension(),
            endpoint: config.embeddings.endpoint.clone(),
            api_key: config.embeddings.api_key.clone(),
            timeout_secs: config.embeddings.timeout_secs,
        })
    }
}

/// Anything that can turn ticket text into an embedding
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector>;
}
