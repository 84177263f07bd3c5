//! Stub collaborators shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use ticket_triage::embeddings::Embedder;
use ticket_triage::llm::ChatMessage;
use ticket_triage::llm::ChatModel;
use ticket_triage::models::Category;
use ticket_triage::models::Confidence;
use ticket_triage::models::EmbeddingVector;
use ticket_triage::models::Neighbor;
use ticket_triage::models::StoredTicketRecord;
use ticket_triage::triage::TriageService;
use ticket_triage::triage::DEFAULT_MATCH_THRESHOLD;
use ticket_triage::vector_store::TicketStore;
use ticket_triage::Result;
use ticket_triage::TriageError;

pub const EMBEDDING: [f32; 4] = [0.1, 0.2, 0.3, 0.4];

/// Returns a fixed vector, or fails when `fail` is set
#[derive(Default)]
pub struct StubEmbedder {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, _text: &str) -> Result<EmbeddingVector> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TriageError::EmbeddingError("embedding service down".to_string()));
        }
        Ok(EMBEDDING.to_vec())
    }
}

/// In-memory store returning a preset nearest neighbour
#[derive(Default)]
pub struct StubStore {
    pub neighbor: Option<Neighbor>,
    pub fail_query: bool,
    pub fail_add: bool,
    pub queries: AtomicUsize,
    pub added: Mutex<Vec<StoredTicketRecord>>,
}

impl StubStore {
    pub fn with_neighbor(distance: f32, response: &str) -> Self {
        Self {
            neighbor: Some(Neighbor {
                id: "stored-1".to_string(),
                document: Some("How do I get a refund?".to_string()),
                distance,
                response: response.to_string(),
                category: Category::Billing,
                confidence: Confidence::High,
            }),
            ..Self::default()
        }
    }

    pub fn added(&self) -> Vec<StoredTicketRecord> {
        self.added.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketStore for StubStore {
    async fn nearest(&self, _embedding: &[f32]) -> Result<Option<Neighbor>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_query {
            return Err(TriageError::VectorStoreError("chroma unreachable".to_string()));
        }
        Ok(self.neighbor.clone())
    }

    async fn add(&self, record: &StoredTicketRecord) -> Result<()> {
        if self.fail_add {
            return Err(TriageError::VectorStoreError("chroma unreachable".to_string()));
        }
        self.added.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Chat model replying with a fixed string, or failing when `reply` is `None`
#[derive(Default)]
pub struct ScriptedModel {
    pub reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let prompt = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);
        self.reply
            .clone()
            .ok_or_else(|| TriageError::LlmError("upstream 502".to_string()))
    }
}

/// Handles kept by a test to inspect what the service did
pub struct Harness {
    pub embedder: Arc<StubEmbedder>,
    pub store: Arc<StubStore>,
    pub llm: Arc<ScriptedModel>,
    pub service: TriageService,
}

pub fn harness(embedder: StubEmbedder, store: StubStore, llm: ScriptedModel) -> Harness {
    let embedder = Arc::new(embedder);
    let store = Arc::new(store);
    let llm = Arc::new(llm);
    let service = TriageService::from_services(
        embedder.clone(),
        llm.clone(),
        store.clone(),
        DEFAULT_MATCH_THRESHOLD,
    );
    Harness {
        embedder,
        store,
        llm,
        service,
    }
}

pub fn llm_json(action: &str, category: &str, confidence: &str, response: &str) -> String {
    serde_json::json!({
        "action": action,
        "category": category,
        "confidence": confidence,
        "response": response,
    })
    .to_string()
}
