//! Nearest-neighbour lookup of previously answered tickets

use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use crate::embeddings::Embedder;
use crate::models::EmbeddingVector;
use crate::models::Neighbor;
use crate::vector_store::TicketStore;

/// Result of a lookup.
///
/// The embedding is returned even when nothing matched so the caller can
/// store the new ticket without embedding it again.
#[derive(Debug, Clone, Default)]
pub struct LookupOutcome {
    pub matched: Option<Neighbor>,
    pub embedding: Option<EmbeddingVector>,
}

/// Finds a stored answer for a near-duplicate ticket
pub struct SimilarityLookup {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn TicketStore>,
    threshold: f32,
}

impl SimilarityLookup {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn TicketStore>, threshold: f32) -> Self {
        Self {
            embedder,
            store,
            threshold,
        }
    }

    /// Whether a neighbour at `distance` counts as the same ticket
    pub fn accepts(&self, distance: f32) -> bool {
        distance < self.threshold
    }

    /// Look up the closest stored ticket. Never fails: collaborator errors are
    /// logged and reported as "no match".
    pub async fn find(&self, text: &str) -> LookupOutcome {
        let embedding = match self.embedder.embed(text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Embedding failed, skipping answer cache: {}", e);
                return LookupOutcome::default();
            }
        };

        let neighbor = match self.store.nearest(&embedding).await {
            Ok(neighbor) => neighbor,
            Err(e) => {
                warn!("Vector store query failed, skipping answer cache: {}", e);
                return LookupOutcome {
                    matched: None,
                    embedding: Some(embedding),
                };
            }
        };

        let matched = neighbor.filter(|n| {
            let accepted = self.accepts(n.distance);
            if accepted {
                debug!("Matched stored ticket {} (distance {:.4})", n.id, n.distance);
            } else {
                debug!(
                    "Nearest ticket {} too far (distance {:.4} >= {})",
                    n.id, n.distance, self.threshold
                );
            }
            accepted
        });

        LookupOutcome {
            matched,
            embedding: Some(embedding),
        }
    }
}
