use std::sync::Arc;

use tracing::info;

use faqdb_core::config::Settings;
use faqdb_core::traits::Embedder;
use faqdb_core::Result;
use faqdb_embed::get_default_embedder;
use faqdb_vector::VectorStore;

use crate::indexer::Indexer;
use crate::retriever::Retriever;
use crate::tool::ContextTool;

/// Process-wide collaborators, built once at startup and handed to the
/// indexer and retriever.
pub struct Services {
    pub settings: Settings,
    pub embedder: Arc<dyn Embedder>,
    pub store: VectorStore,
}

impl Services {
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let embedder = get_default_embedder(&settings.embedding)?;
        let store = Self::open_store(&settings).await?;
        info!(store = %settings.store_path().display(), collection = %settings.store.collection, embedder = embedder.id(), "services ready");
        Ok(Self { settings, embedder, store })
    }

    /// Open the configured collection without loading an embedder; enough
    /// for status reporting.
    pub async fn open_store(settings: &Settings) -> Result<VectorStore> {
        VectorStore::open(&settings.store_path(), &settings.store.collection, &settings.store.meta_table).await
    }

    pub fn indexer(&self) -> Indexer {
        Indexer::new(Arc::clone(&self.embedder), self.store.clone(), self.settings.embedding.batch_size)
    }

    pub async fn retriever(&self) -> Result<Retriever> {
        Retriever::open(Arc::clone(&self.embedder), self.store.clone(), self.settings.retrieval.clone()).await
    }

    pub async fn context_tool(&self) -> Result<ContextTool> {
        Ok(ContextTool::new(self.retriever().await?))
    }
}
