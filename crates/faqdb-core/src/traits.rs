use crate::error::Result;

/// A deterministic text embedding function.
///
/// The indexer and the retriever must share the same implementation (same
/// `id`), otherwise similarity scores are meaningless. Implementations return
/// L2-normalized vectors of length `dim()` in the same order as `texts`.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the model/embedding space (e.g. `hash:xxh64:d384`).
    fn id(&self) -> &str;
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// True when `v` has no direction (all components zero or non-finite norm),
/// which makes cosine similarity against it undefined.
pub fn is_degenerate(v: &[f32]) -> bool {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    !norm.is_finite() || norm <= f32::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_nan_vectors_are_degenerate() {
        assert!(is_degenerate(&[0.0, 0.0, 0.0]));
        assert!(is_degenerate(&[f32::NAN, 1.0]));
        assert!(is_degenerate(&[]));
        assert!(!is_degenerate(&[0.0, 1.0]));
    }
}
