//! Shared domain types, error kinds, configuration and corpus loading for faqdb.

pub mod config;
pub mod corpus;
pub mod error;
pub mod telemetry;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
