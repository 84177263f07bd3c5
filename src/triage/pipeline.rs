//! Complete triage pipeline: Lookup -> Classify -> Store

use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use super::Classifier;
use super::SimilarityLookup;
use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::embeddings::EmbeddingClient;
use crate::errors::Result;
use crate::llm::ChatModel;
use crate::llm::LlmService;
use crate::models::ClassificationResult;
use crate::models::EmbeddingVector;
use crate::models::StoredTicketRecord;
use crate::models::Ticket;
use crate::models::TicketReply;
use crate::vector_store::ChromaStore;
use crate::vector_store::TicketStore;

/// Answers tickets from the cache when possible, otherwise from the LLM
pub struct TriageService {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn TicketStore>,
    lookup: SimilarityLookup,
    classifier: Classifier,
}

impl TriageService {
    /// Build the service from configuration.
    ///
    /// No collaborator is contacted here, so an unreachable vector store only
    /// turns lookups into misses.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::new(EmbeddingClient::from_app_config(config)?);
        let llm: Arc<dyn ChatModel> = Arc::new(LlmService::new(config)?);
        let store: Arc<dyn TicketStore> = Arc::new(ChromaStore::new(&config.vector_store)?);

        Ok(Self::from_services(
            embedder,
            llm,
            store,
            config.match_threshold(),
        ))
    }

    /// Create from existing services
    #[must_use]
    pub fn from_services(
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn ChatModel>,
        store: Arc<dyn TicketStore>,
        match_threshold: f32,
    ) -> Self {
        let lookup = SimilarityLookup::new(embedder.clone(), store.clone(), match_threshold);
        let classifier = Classifier::new(llm);

        Self {
            embedder,
            store,
            lookup,
            classifier,
        }
    }

    /// Answer one ticket.
    ///
    /// Only blank input is an error; collaborator failures degrade to a
    /// cache miss or the apology reply.
    pub async fn process(&self, text: &str) -> Result<TicketReply> {
        let ticket = Ticket::new(text)?;
        info!("Processing ticket ({} chars)", ticket.raw_text.len());

        // Step 1: Look for a near-duplicate answered ticket
        debug!("Step 1: Similarity lookup");
        let outcome = self.lookup.find(&ticket.raw_text).await;
        if let Some(neighbor) = outcome.matched {
            info!(
                "Answered from stored ticket {} (d={:.3}): {:?}",
                neighbor.id, neighbor.distance, neighbor.document
            );
            return Ok(TicketReply::from_match(&neighbor));
        }

        // Step 2: Classify and draft a reply
        debug!("Step 2: Classification");
        let result = self.classifier.classify(&ticket.raw_text).await;
        info!(
            "Classified ticket: action={} category={} confidence={}",
            result.action, result.category, result.confidence
        );

        // Step 3: Remember the answer for future matches
        if result.is_storable() {
            debug!("Step 3: Storing ticket");
            self.store_ticket(&ticket, outcome.embedding, &result).await;
        } else {
            debug!("Fallback reply, not storing ticket");
        }

        Ok(TicketReply::from_classification(result))
    }

    /// Persist a freshly answered ticket; failures are logged, not returned
    async fn store_ticket(
        &self,
        ticket: &Ticket,
        embedding: Option<EmbeddingVector>,
        result: &ClassificationResult,
    ) {
        let embedding = match embedding {
            Some(embedding) => embedding,
            None => match self.embedder.embed(&ticket.raw_text).await {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!("Embedding failed, ticket not stored: {}", e);
                    return;
                }
            },
        };

        let record = StoredTicketRecord::new(ticket, embedding, result);
        if let Err(e) = self.store.add(&record).await {
            warn!("Error storing ticket {}: {}", record.id, e);
        }
    }
}
