//! Prompt templates for ticket triage

use std::collections::HashMap;

use crate::models::FORWARD_MESSAGE;

/// Template with `{{name}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template with variables
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, &str>) -> String {
        let mut result = self.template.clone();
        for var in &self.variables {
            if let Some(value) = values.get(var.as_str()) {
                result = result.replace(&format!("{{{{{var}}}}}"), value);
            }
        }
        result
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract variable names from template
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next(); // skip second '{'
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                chars.next();
                if ch == '}' {
                    if chars.peek() == Some(&'}') {
                        chars.next();
                    }
                    break;
                }
                var_name.push(ch);
            }
            let var_name = var_name.trim().to_string();
            if !var_name.is_empty() && !variables.contains(&var_name) {
                variables.push(var_name);
            }
        }
    }

    variables
}

/// Persona shared by every triage prompt
pub const ASSISTANT_PERSONA: &str = "You are Mai, a helpful AI support agent for airline ticketing, \
booking, flights and travel support.";

/// Standard triage prompt templates
pub struct TriagePrompts;

impl TriagePrompts {
    /// One-shot classification and reply, answered as a JSON object
    #[must_use]
    pub fn classify_and_respond() -> PromptTemplate {
        PromptTemplate::new(format!(
            r#"{ASSISTANT_PERSONA}

Read the user message and reply with a single JSON object and nothing else:
{{"action": "...", "category": "...", "confidence": "...", "response": "..."}}

action:
- "greet" if the message is mainly a greeting (hello, hi, hey, good morning) with no other question.
  Then write a short, friendly greeting introducing yourself as Mai. Use category "Other" and confidence "High".
- "irrelevant" if the message is not about airline ticketing, booking, flights or travel support.
  Then say you can only help with ticketing and travel queries and suggest contacting general support.
- "respond" otherwise.

category: one of "Billing", "Technical", "Account", "Other".

confidence: one of "High", "Moderate", "Low".
High = a clear ticket or travel action (buying, booking, cancelling),
Moderate = somewhat uncertain,
Low = you have no clue or it is outside what you can help with.

response:
- If confidence is High or Moderate, give a clear, friendly, structured answer.
  Use bullet points or numbered steps to sort the information logically.
- If confidence is Low, respond exactly: "{FORWARD_MESSAGE}"
- Do NOT mention the category or confidence in the response.

User message: {{{{text}}}}"#
        ))
    }

    /// Render the classification prompt for one ticket
    #[must_use]
    pub fn render_classification(text: &str) -> String {
        Self::classify_and_respond().render(&HashMap::from([("text", text)]))
    }
}
