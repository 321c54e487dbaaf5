use std::sync::Arc;
use std::time::Instant;

use tokio::time::timeout;
use tracing::{debug, warn};

use faqdb_core::config::RetrievalSettings;
use faqdb_core::traits::{is_degenerate, Embedder};
use faqdb_core::types::{ContextRequest, Payload, SearchHit};
use faqdb_core::{Error, Result};
use faqdb_vector::VectorStore;

/// Answers similarity queries against the FAQ collection.
///
/// Construct once per process and clone freely; clones share the embedder and
/// the store connection.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: VectorStore,
    settings: RetrievalSettings,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, store: VectorStore, settings: RetrievalSettings) -> Self {
        Self { embedder, store, settings }
    }

    /// Like [`Retriever::new`], but first checks that the collection was built
    /// with the same embedder.
    pub async fn open(embedder: Arc<dyn Embedder>, store: VectorStore, settings: RetrievalSettings) -> Result<Self> {
        match store.info().await? {
            Some(info) if info.embedder_id != embedder.id() => {
                return Err(Error::EmbedderMismatch { indexed: info.embedder_id, current: embedder.id().to_string() });
            }
            Some(_) => {}
            None => warn!(collection = store.collection(), "no ingestion record found; cannot verify embedder compatibility"),
        }
        Ok(Self::new(embedder, store, settings))
    }

    pub fn settings(&self) -> &RetrievalSettings { &self.settings }

    /// Payloads of the top matches, best first.
    pub async fn query(&self, request: &ContextRequest) -> Result<Vec<Payload>> {
        Ok(self.search(request).await?.into_iter().map(|hit| hit.payload).collect())
    }

    /// The top matches serialized as a JSON array (`[]` when nothing matches).
    pub async fn query_json(&self, request: &ContextRequest) -> Result<String> {
        let payloads = self.query(request).await?;
        Ok(serde_json::to_string(&payloads)?)
    }

    pub async fn search(&self, request: &ContextRequest) -> Result<Vec<SearchHit>> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(Error::InvalidRequest("query must not be empty".into()));
        }
        let locality = match (request.filter, request.locality()) {
            (true, Some(locality)) => Some(locality),
            (true, None) if self.settings.strict_filter => return Err(Error::FilterMismatch),
            (true, None) => {
                warn!("filter requested without a locality; searching all localities");
                None
            }
            (false, _) => None,
        };
        if let Some(l) = locality {
            if !self.settings.localities.iter().any(|known| known == l) {
                debug!(locality = l, "filtering on a locality outside the configured list");
            }
        }

        let started = Instant::now();
        let vector = self.embed_query(query).await?;
        let deadline = self.settings.search_timeout();
        let hits = timeout(deadline, self.store.search(&vector, self.settings.top_k, locality))
            .await
            .map_err(|_| Error::Timeout { operation: "index query", after: deadline })??;
        debug!(
            collection = self.store.collection(),
            locality = locality.unwrap_or("*"),
            hits = hits.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "retrieved context"
        );
        Ok(hits)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let texts = vec![query.to_string()];
        let deadline = self.settings.timeout();
        let mut vectors = timeout(deadline, tokio::task::spawn_blocking(move || embedder.embed_batch(&texts)))
            .await
            .map_err(|_| Error::Timeout { operation: "query embedding", after: deadline })?
            .map_err(|e| Error::Embedding(format!("embedding task failed: {e}")))??;
        if vectors.len() != 1 {
            return Err(Error::Embedding(format!("expected one query vector, got {}", vectors.len())));
        }
        let vector = vectors.remove(0);
        if is_degenerate(&vector) {
            return Err(Error::Embedding(format!("query '{query}' has no embeddable content")));
        }
        Ok(vector)
    }
}
