//! Embedding functions for faqdb.
//!
//! Two implementations of [`faqdb_core::traits::Embedder`]: a candle
//! XLM-RoBERTa sentence model and a weight-free hashing embedder. The same
//! instance must be used for ingestion and retrieval.

use std::sync::Arc;

use faqdb_core::config::{EmbeddingKind, EmbeddingSettings};
use faqdb_core::traits::Embedder;
use faqdb_core::{Error, Result};
use tracing::info;

pub mod device;
pub mod hash;
pub mod model;
pub mod pool;
pub mod tokenize;

pub use hash::HashEmbedder;
pub use model::XlmRobertaEmbedder;
pub use pool::masked_mean_l2;

/// `APP_USE_FAKE_EMBEDDINGS=1|true` forces the hashing embedder.
pub fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    if use_fake_embeddings() || settings.kind == EmbeddingKind::Hash {
        info!(dim = settings.dim, "using hashing embedder");
        return Ok(Arc::new(HashEmbedder::new(settings.dim)));
    }
    let load = || -> anyhow::Result<XlmRobertaEmbedder> {
        let dir = model::resolve_model_dir(settings.model_dir.as_deref())?;
        XlmRobertaEmbedder::load(&dir, settings.max_len)
    };
    Ok(Arc::new(load().map_err(|e| Error::Embedding(format!("{e:#}")))?))
}
