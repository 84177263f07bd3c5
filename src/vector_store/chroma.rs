//! Chroma REST client.
//!
//! The collection is resolved with get-or-create on first use and its id is
//! cached; a Chroma outage only surfaces as errors from `nearest`/`add`.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;
use tracing::info;

use super::TicketStore;
use crate::config::VectorStoreConfig;
use crate::errors::Result;
use crate::errors::TriageError;
use crate::models::Category;
use crate::models::Confidence;
use crate::models::Neighbor;
use crate::models::StoredTicketRecord;

/// Chroma REST API generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaApi {
    /// `/api/v1/collections`, Chroma before 0.6
    V1,
    /// `/api/v2/tenants/{tenant}/databases/{database}/collections`
    V2,
}

impl FromStr for ChromaApi {
    type Err = TriageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(TriageError::ConfigError(format!(
                "unknown Chroma API version: {other}"
            ))),
        }
    }
}

/// Handle to one Chroma collection
pub struct ChromaStore {
    client: Client,
    collections_url: String,
    collection_name: String,
    collection_id: OnceCell<String>,
}

impl ChromaStore {
    /// Build the client. No request is made until the first query or add.
    pub fn new(config: &VectorStoreConfig) -> Result<Self> {
        let api: ChromaApi = config.api_version.parse()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TriageError::HttpError(e.to_string()))?;

        let base_url = config.url.trim_end_matches('/');
        let collections_url = match api {
            ChromaApi::V1 => format!("{base_url}/api/v1/collections"),
            ChromaApi::V2 => format!(
                "{base_url}/api/v2/tenants/{}/databases/{}/collections",
                config.tenant, config.database
            ),
        };

        Ok(Self {
            client,
            collections_url,
            collection_name: config.collection.clone(),
            collection_id: OnceCell::new(),
        })
    }

    /// Id of the configured collection, created on first call if missing.
    /// A failed attempt is retried on the next call.
    pub async fn collection_id(&self) -> Result<&str> {
        self.collection_id
            .get_or_try_init(|| async {
                let collection = get_or_create_collection(
                    &self.client,
                    &self.collections_url,
                    &self.collection_name,
                )
                .await?;
                info!(
                    "Using Chroma collection '{}' ({}) at {}",
                    collection.name, collection.id, self.collections_url
                );
                Ok::<_, TriageError>(collection.id)
            })
            .await
            .map(String::as_str)
    }

    async fn collection_url(&self, op: &str) -> Result<String> {
        let id = self.collection_id().await?;
        Ok(format!("{}/{}/{}", self.collections_url, id, op))
    }
}

async fn get_or_create_collection(
    client: &Client,
    collections_url: &str,
    name: &str,
) -> Result<CollectionInfo> {
    let response = client
        .post(collections_url)
        .json(&CreateCollectionRequest {
            name,
            get_or_create: true,
        })
        .send()
        .await
        .map_err(|e| TriageError::VectorStoreError(format!("failed to reach Chroma: {e}")))?;

    check_status(response, "create collection")
        .await?
        .json()
        .await
        .map_err(|e| TriageError::VectorStoreError(format!("invalid collection response: {e}")))
}

async fn check_status(response: reqwest::Response, op: &str) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string());
    Err(TriageError::VectorStoreError(format!(
        "Chroma {op} failed ({status}): {body}"
    )))
}

#[async_trait]
impl TicketStore for ChromaStore {
    async fn nearest(&self, embedding: &[f32]) -> Result<Option<Neighbor>> {
        let request = QueryRequest {
            query_embeddings: vec![embedding],
            n_results: 1,
            include: &["documents", "metadatas", "distances"],
        };

        let response = self
            .client
            .post(self.collection_url("query").await?)
            .json(&request)
            .send()
            .await
            .map_err(|e| TriageError::VectorStoreError(format!("query request failed: {e}")))?;

        let result: QueryResponse = check_status(response, "query")
            .await?
            .json()
            .await
            .map_err(|e| TriageError::VectorStoreError(format!("invalid query response: {e}")))?;

        result.into_nearest()
    }

    async fn add(&self, record: &StoredTicketRecord) -> Result<()> {
        let id = record.id.to_string();
        let metadata = record.metadata.to_flat_map();
        let request = AddRequest {
            ids: vec![id.as_str()],
            documents: vec![record.document.as_str()],
            embeddings: vec![record.embedding.as_slice()],
            metadatas: vec![&metadata],
        };

        let response = self
            .client
            .post(self.collection_url("add").await?)
            .json(&request)
            .send()
            .await
            .map_err(|e| TriageError::VectorStoreError(format!("add request failed: {e}")))?;
        check_status(response, "add").await?;

        debug!("Stored ticket {} in '{}'", id, self.collection_name);
        Ok(())
    }
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    id: String,
    name: String,
}

#[derive(Serialize)]
struct AddRequest<'a> {
    ids: Vec<&'a str>,
    documents: Vec<&'a str>,
    embeddings: Vec<&'a [f32]>,
    metadatas: Vec<&'a HashMap<String, String>>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_embeddings: Vec<&'a [f32]>,
    n_results: usize,
    include: &'a [&'a str],
}

/// Chroma nests every field per query embedding
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<HashMap<String, Value>>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
}

impl QueryResponse {
    fn into_nearest(self) -> Result<Option<Neighbor>> {
        let Some(id) = self.ids.into_iter().next().and_then(|ids| ids.into_iter().next()) else {
            return Ok(None);
        };

        let distance = self
            .distances
            .and_then(|d| d.into_iter().next())
            .and_then(|d| d.into_iter().next())
            .ok_or_else(|| {
                TriageError::VectorStoreError(format!("no distance returned for {id}"))
            })?;

        let document = self
            .documents
            .and_then(|d| d.into_iter().next())
            .and_then(|d| d.into_iter().next())
            .flatten();

        let metadata = self
            .metadatas
            .and_then(|m| m.into_iter().next())
            .and_then(|m| m.into_iter().next())
            .flatten()
            .unwrap_or_default();

        let response = metadata_str(&metadata, "response").ok_or_else(|| {
            TriageError::VectorStoreError(format!("stored ticket {id} has no response"))
        })?;
        let category = metadata_str(&metadata, "category")
            .map_or(Category::Other, |c| Category::from_model(&c));
        let confidence = metadata_str(&metadata, "confidence")
            .map_or(Confidence::Low, |c| Confidence::from_model(&c));

        Ok(Some(Neighbor {
            id,
            document,
            distance,
            response,
            category,
            confidence,
        }))
    }
}

fn metadata_str(metadata: &HashMap<String, Value>, key: &str) -> Option<String> {
    match metadata.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
