//! faqdb-vector
//!
//! LanceDB-backed storage for the FAQ collection. See `store` for the
//! collection API and `table` for connection and meta-table helpers.

pub mod error;
pub mod schema;
pub mod store;
pub mod table;

pub use error::IndexResultExt;
pub use store::{VectorStore, METRIC};
