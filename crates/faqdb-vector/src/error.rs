//! Mapping of LanceDB/Arrow failures onto the faqdb error kinds.

use faqdb_core::{Error, Result};

pub trait IndexResultExt<T> {
    fn index_op(self) -> Result<T>;
}

impl<T> IndexResultExt<T> for std::result::Result<T, lancedb::Error> {
    fn index_op(self) -> Result<T> {
        self.map_err(|e| match e {
            lancedb::Error::TableAlreadyExists { name, .. } => Error::CollectionExists(name),
            lancedb::Error::TableNotFound { name, .. } => Error::CollectionNotFound(name),
            other => Error::IndexOperation(other.to_string()),
        })
    }
}

impl<T> IndexResultExt<T> for std::result::Result<T, arrow_schema::ArrowError> {
    fn index_op(self) -> Result<T> {
        self.map_err(|e| Error::IndexOperation(e.to_string()))
    }
}
