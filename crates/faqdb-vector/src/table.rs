//! LanceDB connection and housekeeping helpers.
//!
//! Provides the database open function (which creates the backing directory)
//! and a simple key/value metadata table used to record how a collection was
//! built.
use lancedb::{connect, Connection};
use lancedb::query::{ExecutableQuery, QueryBase};

use arrow_array::{RecordBatch, RecordBatchIterator, StringArray, TimestampMillisecondArray};
use chrono::Utc;
use futures::TryStreamExt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use faqdb_core::{Error, Result};

use crate::error::IndexResultExt;
use crate::schema::build_meta_schema;

/// Open (or create) the database at `path`, creating the directory first.
pub async fn open_db(path: &Path) -> Result<Connection> {
    std::fs::create_dir_all(path)?;
    debug!(path = %path.display(), "opening lancedb");
    connect(path.to_string_lossy().as_ref()).execute().await.index_op()
}

pub async fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let names = conn.table_names().execute().await.index_op()?;
    Ok(names.iter().any(|n| n == name))
}

pub async fn ensure_meta_table(conn: &Connection, name: &str) -> Result<()> {
    if table_exists(conn, name).await? {
        return Ok(());
    }
    match conn.create_empty_table(name, build_meta_schema()).execute().await.index_op() {
        Ok(_) | Err(Error::CollectionExists(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

pub async fn set_meta(conn: &Connection, table: &str, key: &str, value: &str) -> Result<()> {
    ensure_meta_table(conn, table).await?;
    let t = conn.open_table(table).execute().await.index_op()?;
    let rb = RecordBatch::try_new(
        build_meta_schema(),
        vec![
            Arc::new(StringArray::from(vec![key.to_string()])),
            Arc::new(StringArray::from(vec![value.to_string()])),
            Arc::new(TimestampMillisecondArray::from(vec![Utc::now().timestamp_millis()])),
        ],
    )
    .index_op()?;
    let reader = Box::new(RecordBatchIterator::new(vec![Ok(rb)].into_iter(), build_meta_schema()));
    // Upsert behavior via merge_insert: key is unique
    let mut mi = t.merge_insert(&["key"]);
    mi.when_matched_update_all(None).when_not_matched_insert_all();
    let _ = mi.execute(reader).await.index_op()?;
    Ok(())
}

pub async fn get_meta(conn: &Connection, table: &str, key: &str) -> Result<Option<String>> {
    if !table_exists(conn, table).await? { return Ok(None); }
    let t = conn.open_table(table).execute().await.index_op()?;
    let mut stream = t.query().only_if(format!("key = '{}'", key.replace('\'', "''"))).execute().await.index_op()?;
    while let Some(batch) = stream.try_next().await.map_err(|e| Error::IndexOperation(e.to_string()))? {
        if batch.num_rows() == 0 { continue; }
        let val = batch
            .column_by_name("value")
            .and_then(|c| c.as_any().downcast_ref::<StringArray>())
            .ok_or_else(|| Error::IndexOperation("meta.value column missing".into()))?;
        return Ok(Some(val.value(0).to_string()));
    }
    Ok(None)
}
