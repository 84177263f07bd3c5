//! Hosted LLM access for ticket classification

pub mod client;
pub mod prompts;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

pub use client::LlmService;
pub use prompts::PromptTemplate;
pub use prompts::TriagePrompts;

use crate::errors::Result;

/// A single chat turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A chat-completion backend
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the conversation and return the assistant's text
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Single-prompt convenience wrapper
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(&[ChatMessage::user(prompt)]).await
    }
}
