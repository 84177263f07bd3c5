//! Ticket triage domain types

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::TriageError;

/// Reply sent when the model is not confident enough to answer itself
pub const FORWARD_MESSAGE: &str =
    "Your query is forwarded to our team, we will get back to you shortly.";

/// Reply sent when the model output cannot be used at all
pub const APOLOGY_MESSAGE: &str =
    "Sorry, I couldn't process your request right now. Please try again in a moment.";

/// Embedding vector produced by the embedding provider
pub type EmbeddingVector = Vec<f32>;

/// An incoming support message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub raw_text: String,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Create a ticket, rejecting blank text
    pub fn new(raw_text: impl Into<String>) -> crate::Result<Self> {
        let raw_text = raw_text.into();
        if raw_text.trim().is_empty() {
            return Err(TriageError::InvalidInput("Missing ticket text".to_string()));
        }
        Ok(Self {
            raw_text,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Billing,
    Technical,
    Account,
    Other,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Billing => "Billing",
            Self::Technical => "Technical",
            Self::Account => "Account",
            Self::Other => "Other",
        }
    }

    /// Lenient parse of model output; anything unrecognised is `Other`
    pub fn from_model(value: &str) -> Self {
        value.parse().unwrap_or(Self::Other)
    }
}

impl FromStr for Category {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "billing" => Ok(Self::Billing),
            "technical" => Ok(Self::Technical),
            "account" => Ok(Self::Account),
            "other" => Ok(Self::Other),
            _ => Err(TriageError::InvalidInput(format!("unknown category: {s}"))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Moderate,
    Low,
}

impl Confidence {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
        }
    }

    /// Lenient parse of model output; anything unrecognised is `Low`
    pub fn from_model(value: &str) -> Self {
        value.parse().unwrap_or(Self::Low)
    }
}

impl FromStr for Confidence {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "moderate" | "medium" => Ok(Self::Moderate),
            "low" => Ok(Self::Low),
            _ => Err(TriageError::InvalidInput(format!("unknown confidence: {s}"))),
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the assistant decided to do with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Greet,
    Irrelevant,
    Respond,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greet => "greet",
            Self::Irrelevant => "irrelevant",
            Self::Respond => "respond",
        }
    }
}

impl FromStr for Action {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greet" | "greeting" => Ok(Self::Greet),
            "irrelevant" => Ok(Self::Irrelevant),
            "respond" | "response" => Ok(Self::Respond),
            _ => Err(TriageError::InvalidInput(format!("unknown action: {s}"))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification and drafted reply for one ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub confidence: Confidence,
    pub action: Action,
    pub response: String,
    /// Set when the model output was unusable and the apology was substituted
    #[serde(skip)]
    pub fallback: bool,
}

impl ClassificationResult {
    /// The fixed apology used when classification fails
    pub fn apology() -> Self {
        Self {
            category: Category::Other,
            confidence: Confidence::Low,
            action: Action::Irrelevant,
            response: APOLOGY_MESSAGE.to_string(),
            fallback: true,
        }
    }

    /// Whether this result may be written to the vector store
    pub const fn is_storable(&self) -> bool {
        !self.fallback
    }
}

/// Metadata kept alongside each stored ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMetadata {
    pub response: String,
    pub category: Category,
    pub confidence: Confidence,
    pub action: Action,
    pub timestamp: DateTime<Utc>,
}

impl TicketMetadata {
    /// Flatten into scalar string values, the only shape the vector store accepts
    pub fn to_flat_map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("response".to_string(), self.response.clone()),
            ("category".to_string(), self.category.to_string()),
            ("confidence".to_string(), self.confidence.to_string()),
            ("action".to_string(), self.action.to_string()),
            ("timestamp".to_string(), self.timestamp.to_rfc3339()),
        ])
    }
}

/// A ticket persisted in the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTicketRecord {
    pub id: Uuid,
    pub document: String,
    pub embedding: EmbeddingVector,
    pub metadata: TicketMetadata,
}

impl StoredTicketRecord {
    pub fn new(
        ticket: &Ticket,
        embedding: EmbeddingVector,
        result: &ClassificationResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document: ticket.raw_text.clone(),
            embedding,
            metadata: TicketMetadata {
                response: result.response.clone(),
                category: result.category,
                confidence: result.confidence,
                action: result.action,
                timestamp: Utc::now(),
            },
        }
    }
}

/// Nearest stored ticket returned by a vector-store query
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: String,
    pub document: Option<String>,
    pub distance: f32,
    pub response: String,
    pub category: Category,
    pub confidence: Confidence,
}

/// Answer returned to the caller for one ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketReply {
    pub response: String,
    pub category: Category,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    pub matched: bool,
}

impl TicketReply {
    pub fn from_match(neighbor: &Neighbor) -> Self {
        Self {
            response: neighbor.response.clone(),
            category: neighbor.category,
            confidence: neighbor.confidence,
            action: None,
            matched: true,
        }
    }

    pub fn from_classification(result: ClassificationResult) -> Self {
        Self {
            response: result.response,
            category: result.category,
            confidence: result.confidence,
            action: Some(result.action),
            matched: false,
        }
    }
}
