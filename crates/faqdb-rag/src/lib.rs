//! Retrieval-augmented FAQ answering: the offline [`Indexer`], the per-request
//! [`Retriever`], and the [`ContextTool`] an orchestrator calls.

pub mod indexer;
pub mod retriever;
pub mod services;
pub mod tool;

pub use indexer::{IndexReport, Indexer};
pub use retriever::Retriever;
pub use services::Services;
pub use tool::{ContextTool, Tool, ToolDefinition};
