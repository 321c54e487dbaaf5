use faqdb_core::config::{EmbeddingKind, EmbeddingSettings};
use faqdb_embed::get_default_embedder;

#[test]
fn hash_embedder_shapes_and_determinism() {
    let settings = EmbeddingSettings { kind: EmbeddingKind::Hash, dim: 384, ..EmbeddingSettings::default() };
    let embedder = get_default_embedder(&settings).expect("embedder");
    let texts = vec!["What is the rent due date?".to_string(), "What is the rent due date?".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 384, "embedding dim follows settings");
    assert_eq!(embedder.dim(), 384);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    assert_eq!(v1, v2, "same text gives bit-identical vectors");
}

#[test]
fn batch_order_is_preserved() {
    let settings = EmbeddingSettings { kind: EmbeddingKind::Hash, ..EmbeddingSettings::default() };
    let embedder = get_default_embedder(&settings).expect("embedder");
    let texts = vec!["deposit".to_string(), "boiler".to_string(), "rent".to_string()];
    let batch = embedder.embed_batch(&texts).expect("batch");
    for (text, vector) in texts.iter().zip(&batch) {
        let single = embedder.embed_batch(std::slice::from_ref(text)).expect("single").remove(0);
        assert_eq!(&single, vector);
    }
}

#[test]
fn embedder_id_encodes_dimension() {
    let small = EmbeddingSettings { kind: EmbeddingKind::Hash, dim: 8, ..EmbeddingSettings::default() };
    let large = EmbeddingSettings { kind: EmbeddingKind::Hash, dim: 16, ..EmbeddingSettings::default() };
    let a = get_default_embedder(&small).expect("a");
    let b = get_default_embedder(&large).expect("b");
    assert_ne!(a.id(), b.id());
}
