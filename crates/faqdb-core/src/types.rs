//! Domain types shared by the indexer, the vector store and the retriever.

use serde::{Deserialize, Serialize};

pub type RecordId = u64;

/// One question/answer pair as it appears in the corpus file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// A unit of knowledge ready to be embedded and indexed.
///
/// - `id`: position in the flattened ingestion sequence
/// - `locality`: the corpus key the pair was listed under (e.g. a city)
/// - `question`: the embeddable text
/// - `answer`: returned to the caller as part of the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: RecordId,
    pub locality: String,
    pub question: String,
    pub answer: String,
}

impl Document {
    pub fn payload(&self) -> Payload {
        Payload { locality: self.locality.clone(), answer: self.answer.clone() }
    }
}

/// The metadata stored next to each vector and handed back on retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub locality: String,
    pub answer: String,
}

/// A ranked search result. `score` is cosine similarity; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: RecordId,
    pub score: f32,
    pub payload: Payload,
}

/// Parameters accepted by the context retrieval tool.
///
/// Field names match the wire contract used by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRequest {
    pub query: String,
    pub filter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl ContextRequest {
    pub fn unfiltered(query: impl Into<String>) -> Self {
        Self { query: query.into(), filter: false, city: None }
    }

    pub fn in_city(query: impl Into<String>, city: impl Into<String>) -> Self {
        Self { query: query.into(), filter: true, city: Some(city.into()) }
    }

    /// The locality to filter on, if one was supplied and is non-empty.
    /// The value is returned verbatim; matching is case-sensitive.
    pub fn locality(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.is_empty())
    }
}

/// Bookkeeping written to the meta table after a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub collection: String,
    pub dimension: usize,
    pub metric: String,
    pub embedder_id: String,
    pub corpus_fingerprint: String,
    pub record_count: usize,
    pub indexed_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_city_field_parses() {
        let req: ContextRequest = serde_json::from_str(r#"{"query":"rent","filter":false}"#).expect("parse");
        assert_eq!(req, ContextRequest::unfiltered("rent"));
        assert_eq!(req.locality(), None);
    }

    #[test]
    fn empty_city_is_not_a_locality() {
        let req = ContextRequest::in_city("rent", "");
        assert!(req.filter);
        assert_eq!(req.locality(), None);
    }

    #[test]
    fn payload_serializes_with_two_keys() {
        let doc = Document { id: 3, locality: "London".into(), question: "q".into(), answer: "a".into() };
        let json = serde_json::to_value(doc.payload()).expect("json");
        assert_eq!(json, serde_json::json!({"locality": "London", "answer": "a"}));
    }
}
