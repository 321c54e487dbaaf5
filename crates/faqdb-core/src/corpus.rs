//! Loading of the question/answer corpus.
//!
//! The corpus is a JSON object mapping a locality name to an array of
//! `{question, answer}` objects. Locality order follows the file, so document
//! ids are stable for an unchanged file.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Document, QaPair};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    entries: Vec<(String, Vec<QaPair>)>,
    fingerprint: String,
}

impl Corpus {
    pub fn localities(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Total number of question/answer pairs across all localities.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, pairs)| pairs.len()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// blake3 hex digest of the raw corpus bytes.
    pub fn fingerprint(&self) -> &str { &self.fingerprint }

    /// Flatten into documents; `id` is the position in the flattened sequence.
    pub fn documents(&self) -> Vec<Document> {
        let mut docs = Vec::with_capacity(self.len());
        for (locality, pairs) in &self.entries {
            for pair in pairs {
                docs.push(Document {
                    id: docs.len() as u64,
                    locality: locality.clone(),
                    question: pair.question.clone(),
                    answer: pair.answer.clone(),
                });
            }
        }
        docs
    }
}

pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let raw = fs::read(path).map_err(|e| Error::CorpusFormat(format!("cannot read {}: {e}", path.display())))?;
    let corpus = parse_corpus(&raw)?;
    debug!(path = %path.display(), pairs = corpus.len(), "loaded corpus");
    Ok(corpus)
}

pub fn parse_corpus(raw: &[u8]) -> Result<Corpus> {
    let root: Value = serde_json::from_slice(raw).map_err(|e| Error::CorpusFormat(format!("invalid JSON: {e}")))?;
    let Value::Object(map) = root else {
        return Err(Error::CorpusFormat("top level must be an object keyed by locality".into()));
    };
    let mut entries = Vec::with_capacity(map.len());
    for (locality, value) in map {
        if locality.trim().is_empty() {
            return Err(Error::CorpusFormat("locality names must be non-empty".into()));
        }
        let pairs: Vec<QaPair> = serde_json::from_value(value)
            .map_err(|e| Error::CorpusFormat(format!("locality '{locality}': {e}")))?;
        entries.push((locality, pairs));
    }
    Ok(Corpus { entries, fingerprint: blake3::hash(raw).to_hex().to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_file_order_across_localities() {
        let raw = br#"{
            "London": [{"question": "q1", "answer": "a1"}, {"question": "q2", "answer": "a2"}],
            "Bengaluru": [{"question": "q3", "answer": "a3"}]
        }"#;
        let corpus = parse_corpus(raw).expect("parse");
        let docs = corpus.documents();
        assert_eq!(corpus.localities().collect::<Vec<_>>(), vec!["London", "Bengaluru"]);
        assert_eq!(docs.len(), 3);
        assert_eq!((docs[2].id, docs[2].locality.as_str(), docs[2].question.as_str()), (2, "Bengaluru", "q3"));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = parse_corpus(br#"[{"question": "q", "answer": "a"}]"#).expect_err("array root");
        assert!(matches!(err, Error::CorpusFormat(_)));
    }

    #[test]
    fn rejects_pair_missing_answer() {
        let err = parse_corpus(br#"{"London": [{"question": "q"}]}"#).expect_err("missing answer");
        match err {
            Error::CorpusFormat(msg) => assert!(msg.contains("London"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_empty_locality_name() {
        assert!(parse_corpus(br#"{" ": []}"#).is_err());
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let a = parse_corpus(br#"{"London": []}"#).expect("a");
        let b = parse_corpus(br#"{"Paris": []}"#).expect("b");
        assert!(a.is_empty());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
