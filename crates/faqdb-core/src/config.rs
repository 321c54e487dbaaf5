//! Layered configuration and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys, e.g. `APP_STORE__PATH`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub corpus: CorpusSettings,
    pub embedding: EmbeddingSettings,
    pub retrieval: RetrievalSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub path: String,
    pub collection: String,
    pub meta_table: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { path: "temp/lancedb".into(), collection: "my_collection".into(), meta_table: "meta".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub path: String,
}

impl Default for CorpusSettings {
    fn default() -> Self { Self { path: "data/faq.json".into() } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingKind {
    /// Transformer model loaded from `model_dir`.
    Model,
    /// Feature-hashing embedder; no weights needed.
    Hash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub kind: EmbeddingKind,
    pub model_dir: Option<String>,
    /// Output dimension of the hashing embedder. The model reports its own.
    pub dim: usize,
    pub max_len: usize,
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { kind: EmbeddingKind::Model, model_dir: None, dim: 384, max_len: 256, batch_size: 32 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    /// Deadline for embedding the query.
    pub timeout_ms: u64,
    /// Deadline for the index query; falls back to `timeout_ms` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_timeout_ms: Option<u64>,
    /// Reject `filter=true` without a locality instead of searching unfiltered.
    pub strict_filter: bool,
    /// Localities the corpus is known to cover; published in the tool schema.
    pub localities: Vec<String>,
}

impl RetrievalSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms) }

    pub fn search_timeout(&self) -> Duration { Duration::from_millis(self.search_timeout_ms.unwrap_or(self.timeout_ms)) }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            timeout_ms: 5_000,
            search_timeout_ms: None,
            strict_filter: true,
            localities: vec!["Bengaluru".into(), "London".into(), "NewYork".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub filter: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self { Self { filter: "info".into(), json: false } }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::from_figment(Self::figment(&env_name), &env_name)
    }

    pub fn figment(env_name: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment.merge(Env::prefixed("APP_").split("__"))
    }

    pub fn from_figment(figment: Figment, env_name: &str) -> Result<Self> {
        let settings: Settings = figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate_for_env(env_name)?;
        Ok(settings)
    }

    pub fn validate_for_env(&self, env: &str) -> Result<()> {
        if self.store.collection.trim().is_empty() {
            return Err(Error::InvalidConfig("store.collection must not be empty".into()));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be at least 1".into()));
        }
        if self.retrieval.timeout_ms == 0 || self.retrieval.search_timeout_ms == Some(0) {
            return Err(Error::InvalidConfig("retrieval timeouts must be positive".into()));
        }
        if self.embedding.batch_size == 0 || self.embedding.dim == 0 {
            return Err(Error::InvalidConfig("embedding.batch_size and embedding.dim must be positive".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.retrieval.localities.iter().find(|l| !seen.insert(l.as_str())) {
            return Err(Error::InvalidConfig(format!("retrieval.localities lists '{dup}' twice")));
        }
        match env {
            "prod" | "production" if self.embedding.kind == EmbeddingKind::Hash => {
                Err(Error::InvalidConfig("the hashing embedder is not allowed in production".into()))
            }
            _ => Ok(()),
        }
    }

    pub fn store_path(&self) -> PathBuf { expand_path(&self.store.path) }

    pub fn corpus_path(&self) -> PathBuf { expand_path(&self.corpus.path) }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
