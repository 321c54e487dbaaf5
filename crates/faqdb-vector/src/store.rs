//! The FAQ collection: creation, upsert and cosine similarity search.

use std::path::Path;
use std::sync::Arc;

use arrow_array::types::Float32Type;
use arrow_array::{Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray, UInt64Array};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, DistanceType, Table};
use tracing::{debug, info};

use faqdb_core::types::{CollectionInfo, Document, Payload, SearchHit};
use faqdb_core::{Error, Result};

use crate::error::IndexResultExt;
use crate::schema::{self, build_collection_schema, vector_dimension};
use crate::table::{get_meta, open_db, set_meta, table_exists};

pub const METRIC: &str = "cosine";

/// Handle to one named collection plus its meta table.
///
/// Cheap to clone; clones share the underlying connection, so a single store
/// opened at startup can serve concurrent searches.
#[derive(Clone)]
pub struct VectorStore {
    conn: Connection,
    collection: String,
    meta_table: String,
}

impl VectorStore {
    pub async fn open(path: &Path, collection: &str, meta_table: &str) -> Result<Self> {
        let conn = open_db(path).await?;
        Ok(Self { conn, collection: collection.to_string(), meta_table: meta_table.to_string() })
    }

    pub fn collection(&self) -> &str { &self.collection }

    pub async fn exists(&self) -> Result<bool> { table_exists(&self.conn, &self.collection).await }

    /// Create the collection with a fixed vector width and cosine metric.
    /// Fails with [`Error::CollectionExists`] if the name is taken; the
    /// existing table is left untouched.
    pub async fn create_collection(&self, dim: usize) -> Result<()> {
        let width = i32::try_from(dim)
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| Error::IndexOperation(format!("invalid vector dimension {dim}")))?;
        if self.exists().await? {
            return Err(Error::CollectionExists(self.collection.clone()));
        }
        self.conn
            .create_empty_table(&self.collection, build_collection_schema(width))
            .execute()
            .await
            .index_op()?;
        info!(collection = %self.collection, dim, metric = METRIC, "created collection");
        Ok(())
    }

    async fn table(&self) -> Result<Table> {
        self.conn.open_table(&self.collection).execute().await.index_op()
    }

    /// Vector width the collection was created with.
    pub async fn dimension(&self) -> Result<usize> {
        let table = self.table().await?;
        let schema = table.schema().await.index_op()?;
        vector_dimension(&schema).ok_or_else(|| Error::IndexOperation(format!("collection '{}' has no vector column", self.collection)))
    }

    pub async fn count(&self) -> Result<usize> {
        self.table().await?.count_rows(None).await.index_op()
    }

    /// Insert or replace records keyed by `Document::id`.
    /// Every vector must match the collection's dimension.
    pub async fn upsert(&self, docs: &[Document], vectors: &[Vec<f32>]) -> Result<usize> {
        if docs.len() != vectors.len() {
            return Err(Error::IndexOperation(format!("{} documents but {} vectors", docs.len(), vectors.len())));
        }
        if docs.is_empty() { return Ok(0); }
        let table = self.table().await?;
        let schema = table.schema().await.index_op()?;
        let expected = vector_dimension(&schema).ok_or_else(|| Error::IndexOperation("collection has no vector column".into()))?;
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(Error::DimensionMismatch { expected, actual: bad.len() });
        }

        let batch = records_to_batch(docs, vectors, expected)?;
        let batch_schema = batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), batch_schema));
        let mut mi = table.merge_insert(&[schema::ID]);
        mi.when_matched_update_all(None).when_not_matched_insert_all();
        let _ = mi.execute(reader).await.index_op()?;
        debug!(collection = %self.collection, records = docs.len(), "upserted batch");
        Ok(docs.len())
    }

    /// Top `k` records by cosine similarity to `query`, optionally restricted
    /// to records whose locality equals `locality` exactly.
    pub async fn search(&self, query: &[f32], k: usize, locality: Option<&str>) -> Result<Vec<SearchHit>> {
        let table = self.table().await?;
        let schema = table.schema().await.index_op()?;
        if let Some(expected) = vector_dimension(&schema) {
            if expected != query.len() {
                return Err(Error::DimensionMismatch { expected, actual: query.len() });
            }
        }
        if k == 0 || table.count_rows(None).await.index_op()? == 0 {
            return Ok(Vec::new());
        }

        let mut q = table.vector_search(query.to_vec()).index_op()?.distance_type(DistanceType::Cosine).limit(k);
        if let Some(loc) = locality {
            q = q.only_if(format!("{} = '{}'", schema::LOCALITY, loc.replace('\'', "''")));
        }
        let batches: Vec<RecordBatch> = q
            .execute()
            .await
            .index_op()?
            .try_collect()
            .await
            .map_err(|e| Error::IndexOperation(format!("search failed: {e}")))?;

        let mut hits = Vec::new();
        for batch in &batches {
            hits.extend(batch_to_hits(batch)?);
        }
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }

    pub async fn write_info(&self, info: &CollectionInfo) -> Result<()> {
        let value = serde_json::to_string(info)?;
        set_meta(&self.conn, &self.meta_table, &self.info_key(), &value).await
    }

    /// Ingestion bookkeeping for this collection, if it has been recorded.
    pub async fn info(&self) -> Result<Option<CollectionInfo>> {
        match get_meta(&self.conn, &self.meta_table, &self.info_key()).await? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| Error::IndexOperation(format!("corrupt collection info: {e}"))),
            None => Ok(None),
        }
    }

    fn info_key(&self) -> String { format!("collection_info:{}", self.collection) }
}

fn records_to_batch(docs: &[Document], vectors: &[Vec<f32>], dim: usize) -> Result<RecordBatch> {
    let width = i32::try_from(dim).map_err(|_| Error::IndexOperation(format!("invalid vector dimension {dim}")))?;
    let schema = build_collection_schema(width);
    let ids = UInt64Array::from(docs.iter().map(|d| d.id).collect::<Vec<_>>());
    let localities = StringArray::from_iter_values(docs.iter().map(|d| d.locality.as_str()));
    let questions = StringArray::from_iter_values(docs.iter().map(|d| d.question.as_str()));
    let answers = StringArray::from_iter_values(docs.iter().map(|d| d.answer.as_str()));
    let vector_array = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
        vectors.iter().map(|v| Some(v.iter().copied().map(Some).collect::<Vec<_>>())),
        width,
    );
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(ids),
            Arc::new(localities),
            Arc::new(questions),
            Arc::new(answers),
            Arc::new(vector_array) as Arc<dyn Array>,
        ],
    )
    .index_op()
}

fn batch_to_hits(batch: &RecordBatch) -> Result<Vec<SearchHit>> {
    let column = |name: &str| batch.column_by_name(name).ok_or_else(|| Error::IndexOperation(format!("search result missing '{name}' column")));
    let ids = column(schema::ID)?.as_any().downcast_ref::<UInt64Array>();
    let localities = column(schema::LOCALITY)?.as_any().downcast_ref::<StringArray>();
    let answers = column(schema::ANSWER)?.as_any().downcast_ref::<StringArray>();
    let distances = column(schema::DISTANCE)?.as_any().downcast_ref::<Float32Array>();
    let (Some(ids), Some(localities), Some(answers), Some(distances)) = (ids, localities, answers, distances) else {
        return Err(Error::IndexOperation("unexpected column types in search result".into()));
    };
    Ok((0..batch.num_rows())
        .map(|i| SearchHit {
            id: ids.value(i),
            // cosine distance is 1 - cosine similarity
            score: 1.0 - distances.value(i),
            payload: Payload { locality: localities.value(i).to_string(), answer: answers.value(i).to_string() },
        })
        .collect())
}
