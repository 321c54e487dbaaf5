use faqdb_core::types::{CollectionInfo, Document};
use faqdb_core::Error;
use faqdb_vector::VectorStore;
use tempfile::TempDir;

fn doc(id: u64, locality: &str, answer: &str) -> Document {
    Document { id, locality: locality.into(), question: format!("question {id}"), answer: answer.into() }
}

async fn open(tmp: &TempDir) -> VectorStore {
    VectorStore::open(&tmp.path().join("lancedb"), "faq_test", "meta").await.expect("open")
}

#[tokio::test]
async fn open_creates_backing_directory() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested/lancedb");
    let store = VectorStore::open(&path, "faq_test", "meta").await.expect("open");
    assert!(path.is_dir());
    assert!(!store.exists().await.unwrap());
}

#[tokio::test]
async fn second_create_is_rejected_and_keeps_records() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp).await;
    store.create_collection(4).await.expect("create");
    store.upsert(&[doc(0, "London", "a")], &[vec![1.0, 0.0, 0.0, 0.0]]).await.expect("upsert");

    let err = store.create_collection(4).await.expect_err("second create");
    assert!(matches!(err, Error::CollectionExists(ref name) if name == "faq_test"));
    assert_eq!(store.count().await.unwrap(), 1, "existing records survive");
    assert_eq!(store.dimension().await.unwrap(), 4);
}

#[tokio::test]
async fn upsert_rejects_wrong_dimension() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp).await;
    store.create_collection(4).await.unwrap();
    let err = store.upsert(&[doc(0, "London", "a")], &[vec![1.0, 0.0, 0.0]]).await.expect_err("short vector");
    assert!(matches!(err, Error::DimensionMismatch { expected: 4, actual: 3 }));
    assert_eq!(store.count().await.unwrap(), 0, "nothing written");
}

#[tokio::test]
async fn upsert_replaces_by_id() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp).await;
    store.create_collection(2).await.unwrap();
    store.upsert(&[doc(0, "London", "old"), doc(1, "London", "b")], &[vec![1.0, 0.0], vec![0.0, 1.0]]).await.unwrap();
    store.upsert(&[doc(0, "London", "new")], &[vec![1.0, 0.0]]).await.unwrap();

    assert_eq!(store.count().await.unwrap(), 2);
    let hits = store.search(&[1.0, 0.0], 5, None).await.unwrap();
    assert_eq!(hits[0].payload.answer, "new");
}

#[tokio::test]
async fn search_ranks_by_cosine_similarity() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp).await;
    store.create_collection(3).await.unwrap();
    let docs = vec![doc(0, "London", "x"), doc(1, "London", "y"), doc(2, "NewYork", "z")];
    let vectors = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.7, 0.7, 0.0]];
    store.upsert(&docs, &vectors).await.unwrap();

    let hits = store.search(&[0.9, 0.1, 0.0], 5, None).await.unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].payload.answer, "x");
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score), "descending scores");
}

#[tokio::test]
async fn locality_filter_is_exact_and_case_sensitive() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp).await;
    store.create_collection(2).await.unwrap();
    let docs = vec![doc(0, "London", "l"), doc(1, "Bengaluru", "b")];
    store.upsert(&docs, &[vec![1.0, 0.0], vec![0.0, 1.0]]).await.unwrap();

    let hits = store.search(&[1.0, 0.0], 5, Some("Bengaluru")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].payload.locality, "Bengaluru");

    assert!(store.search(&[1.0, 0.0], 5, Some("bengaluru")).await.unwrap().is_empty());
    assert!(store.search(&[1.0, 0.0], 5, Some("O'Hare")).await.unwrap().is_empty(), "quotes are escaped");
}

#[tokio::test]
async fn search_on_empty_collection_returns_nothing() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp).await;
    store.create_collection(2).await.unwrap();
    assert!(store.search(&[1.0, 0.0], 5, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_on_missing_collection_fails() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp).await;
    let err = store.search(&[1.0, 0.0], 5, None).await.expect_err("missing");
    assert!(matches!(err, Error::CollectionNotFound(_) | Error::IndexOperation(_)), "{err}");
}

#[tokio::test]
async fn collection_info_round_trips_through_meta_table() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp).await;
    assert_eq!(store.info().await.unwrap(), None);
    let info = CollectionInfo {
        collection: "faq_test".into(),
        dimension: 2,
        metric: faqdb_vector::METRIC.into(),
        embedder_id: "hash:xxh64:d2".into(),
        corpus_fingerprint: "abc".into(),
        record_count: 0,
        indexed_at: "2026-01-01T00:00:00Z".into(),
    };
    store.write_info(&info).await.unwrap();
    store.write_info(&CollectionInfo { record_count: 7, ..info.clone() }).await.unwrap();
    assert_eq!(store.info().await.unwrap().map(|i| i.record_count), Some(7));
}
