//! Vector store access for previously answered tickets

pub mod chroma;

use async_trait::async_trait;

pub use chroma::ChromaApi;
pub use chroma::ChromaStore;

use crate::errors::Result;
use crate::models::Neighbor;
use crate::models::StoredTicketRecord;

/// Storage and nearest-neighbour lookup of answered tickets
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Closest stored ticket to `embedding`, if the collection is not empty
    async fn nearest(&self, embedding: &[f32]) -> Result<Option<Neighbor>>;

    /// Persist one answered ticket
    async fn add(&self, record: &StoredTicketRecord) -> Result<()>;
}
