use std::hash::{Hash, Hasher};

use faqdb_core::traits::Embedder;
use faqdb_core::Result;
use twox_hash::XxHash64;

/// Feature-hashing embedder: deterministic, weight-free, L2-normalized.
///
/// Lowercased alphanumeric tokens are hashed into `dim` buckets, so texts that
/// share words land close together under cosine similarity. Used in tests and
/// development, selected with `embedding.kind = "hash"` or
/// `APP_USE_FAKE_EMBEDDINGS=1`.
pub struct HashEmbedder {
    dim: usize,
    id: String,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim, id: format!("hash:xxh64:d{dim}") }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let lowered = text.to_lowercase();
        let tokens = lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty());
        for (i, token) in tokens.enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let val = ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += 0.5 + val + (i % 3) as f32 * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl Embedder for HashEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { usize::MAX }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

    #[test]
    fn punctuation_and_case_do_not_change_tokens() {
        let e = HashEmbedder::new(64);
        assert_eq!(e.embed_text("Rent due?"), e.embed_text("rent DUE"));
    }

    #[test]
    fn shared_words_score_higher_than_disjoint_ones() {
        let e = HashEmbedder::new(384);
        let q = e.embed_text("When is rent due?");
        let near = e.embed_text("What is the rent due date?");
        let far = e.embed_text("Who repairs the boiler");
        assert!(cosine(&q, &near) > cosine(&q, &far));
    }
}
