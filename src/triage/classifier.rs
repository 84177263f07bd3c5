//! Single-prompt ticket classification.
//!
//! One chat call returns `{action, category, confidence, response}` as JSON.
//! The reply policy is applied here regardless of what the model wrote:
//! greetings are always `High`/`Other`, `Low` confidence always gets the
//! forwarding message, and unusable output becomes the apology fallback.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;
use tracing::warn;

use crate::errors::Result;
use crate::errors::TriageError;
use crate::llm::ChatMessage;
use crate::llm::ChatModel;
use crate::llm::TriagePrompts;
use crate::models::Action;
use crate::models::Category;
use crate::models::ClassificationResult;
use crate::models::Confidence;
use crate::models::FORWARD_MESSAGE;

/// Raw model output before normalisation
#[derive(Debug, Deserialize)]
struct RawClassification {
    action: Option<String>,
    category: Option<String>,
    confidence: Option<String>,
    response: Option<String>,
}

/// Classifies tickets and drafts replies through a chat model
pub struct Classifier {
    llm: Arc<dyn ChatModel>,
}

impl Classifier {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    /// Classify one ticket. Never fails: transport errors and unparseable
    /// output both yield [`ClassificationResult::apology`].
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        let prompt = TriagePrompts::render_classification(text);

        let raw = match self.llm.chat(&[ChatMessage::user(prompt)]).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("LLM call failed: {}", e);
                return ClassificationResult::apology();
            }
        };
        debug!("LLM classification output: {}", raw);

        match parse_classification(&raw) {
            Ok(result) => result,
            Err(e) => {
                warn!("Unusable LLM output ({}): {}", e, raw);
                ClassificationResult::apology()
            }
        }
    }
}

/// Strip a surrounding markdown code fence such as ```` ```json ... ``` ````
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // the info string (e.g. `json`) may share a line with the body
    let body = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse and normalise the model's JSON reply
pub fn parse_classification(raw: &str) -> Result<ClassificationResult> {
    let parsed: RawClassification = serde_json::from_str(strip_code_fence(raw))?;

    let action = match parsed.action.as_deref() {
        Some(action) => action.parse()?,
        None => Action::Respond,
    };

    let response = parsed
        .response
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let mut result = ClassificationResult {
        category: parsed
            .category
            .as_deref()
            .map_or(Category::Other, Category::from_model),
        confidence: parsed
            .confidence
            .as_deref()
            .map_or(Confidence::Low, Confidence::from_model),
        action,
        response: String::new(),
        fallback: false,
    };

    if result.action == Action::Greet {
        result.category = Category::Other;
        result.confidence = Confidence::High;
    }

    if result.confidence == Confidence::Low {
        result.response = FORWARD_MESSAGE.to_string();
    } else {
        result.response = response
            .ok_or_else(|| TriageError::LlmError("model returned an empty response".to_string()))?;
    }

    Ok(result)
}
