use std::sync::Arc;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use faqdb_core::corpus::Corpus;
use faqdb_core::traits::{is_degenerate, Embedder};
use faqdb_core::types::{CollectionInfo, Document};
use faqdb_core::{Error, Result};
use faqdb_vector::{VectorStore, METRIC};

/// Outcome of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub collection: String,
    pub records: usize,
    /// `None` when the corpus was empty and nothing was written.
    pub dimension: Option<usize>,
    /// Whether this run created the collection.
    pub created: bool,
}

/// Builds the collection from a corpus: embed every question, create the
/// collection sized from the first vector, upsert all records.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    store: VectorStore,
    batch_size: usize,
    show_progress: bool,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn Embedder>, store: VectorStore, batch_size: usize) -> Self {
        Self { embedder, store, batch_size: batch_size.max(1), show_progress: false }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn index_corpus(&self, corpus: &Corpus) -> Result<IndexReport> {
        let collection = self.store.collection().to_string();
        let docs = corpus.documents();
        if docs.is_empty() {
            warn!(%collection, "corpus is empty; nothing to index");
            return Ok(IndexReport { collection, records: 0, dimension: None, created: false });
        }
        info!(%collection, documents = docs.len(), embedder = self.embedder.id(), "indexing corpus");

        let embeddings = self.embed_all(&docs).await?;
        let dimension = embeddings[0].len();
        let created = match self.store.create_collection(dimension).await {
            Ok(()) => true,
            Err(Error::CollectionExists(name)) => {
                if let Some(existing) = self.store.info().await? {
                    if existing.embedder_id != self.embedder.id() {
                        return Err(Error::EmbedderMismatch { indexed: existing.embedder_id, current: self.embedder.id().to_string() });
                    }
                }
                info!(collection = %name, "collection already exists; upserting into it");
                false
            }
            Err(e) => return Err(e),
        };

        let records = self.store.upsert(&docs, &embeddings).await?;
        let info = CollectionInfo {
            collection: collection.clone(),
            dimension,
            metric: METRIC.to_string(),
            embedder_id: self.embedder.id().to_string(),
            corpus_fingerprint: corpus.fingerprint().to_string(),
            record_count: self.store.count().await?,
            indexed_at: Utc::now().to_rfc3339(),
        };
        self.store.write_info(&info).await?;
        info!(%collection, records, dimension, created, "indexing completed");
        Ok(IndexReport { collection, records, dimension: Some(dimension), created })
    }

    /// Embed question texts in batches; output order matches `docs`.
    async fn embed_all(&self, docs: &[Document]) -> Result<Vec<Vec<f32>>> {
        let pb = if self.show_progress { ProgressBar::new(docs.len() as u64) } else { ProgressBar::hidden() };
        if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} questions ({percent}%) {msg}") {
            pb.set_style(style.progress_chars("#>-"));
        }
        let mut out = Vec::with_capacity(docs.len());
        for chunk in docs.chunks(self.batch_size) {
            let texts: Vec<String> = chunk.iter().map(|d| d.question.clone()).collect();
            let embedder = Arc::clone(&self.embedder);
            let vectors = tokio::task::spawn_blocking(move || embedder.embed_batch(&texts))
                .await
                .map_err(|e| Error::Embedding(format!("embedding task failed: {e}")))??;
            if vectors.len() != chunk.len() {
                return Err(Error::Embedding(format!("embedder returned {} vectors for {} texts", vectors.len(), chunk.len())));
            }
            if let Some((doc, _)) = chunk.iter().zip(&vectors).find(|(_, v)| is_degenerate(v)) {
                return Err(Error::Embedding(format!("question {} ('{}') has no embeddable content", doc.id, doc.question)));
            }
            out.extend(vectors);
            pb.inc(chunk.len() as u64);
        }
        pb.finish_with_message("embedded");
        Ok(out)
    }
}
