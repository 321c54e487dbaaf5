use std::fs;

use faqdb_core::corpus::load_corpus;
use faqdb_core::Error;
use tempfile::TempDir;

#[test]
fn load_corpus_from_disk_flattens_all_localities() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("faq.json");
    fs::write(
        &path,
        r#"{
            "Bengaluru": [{"question": "What is the rent due date?", "answer": "5th of each month"}],
            "London": [
                {"question": "Who fixes the boiler?", "answer": "The landlord"},
                {"question": "Is the deposit protected?", "answer": "Yes, in a government scheme"}
            ]
        }"#,
    )
    .unwrap();

    let corpus = load_corpus(&path).expect("load");
    let docs = corpus.documents();

    assert_eq!(docs.len(), 3, "one document per pair");
    assert_eq!(docs[0].answer, "5th of each month");
    assert_eq!(docs[1].locality, "London");
    let ids: Vec<u64> = docs.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![0, 1, 2], "ids are positional");
}

#[test]
fn missing_corpus_file_is_a_format_error() {
    let tmp = TempDir::new().unwrap();
    let err = load_corpus(&tmp.path().join("absent.json")).expect_err("missing file");
    assert!(matches!(err, Error::CorpusFormat(_)));
}

#[test]
fn wrong_value_type_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("faq.json");
    fs::write(&path, r#"{"London": {"question": "q", "answer": "a"}}"#).unwrap();
    assert!(matches!(load_corpus(&path), Err(Error::CorpusFormat(_))));
}
