//! Core type definitions for the monitoring configuration importer.
//!
//! This crate defines the plain data shared by the import pipeline and its
//! consumers:
//! - Tags scoping what the remote configuration service returns
//! - The closed set of entity kinds and their wire names
//! - Schema-less entity records (ordered field maps)
//! - The merged configuration bundle handed to the consumer
//!
//! Nothing here performs I/O.

mod bundle;
mod kind;
mod record;
mod tag;

pub use bundle::Bundle;
pub use kind::EntityKind;
pub use record::EntityRecord;
pub use tag::Tag;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown entity kind: {0}")]
    UnknownKind(String),

    #[error("record is not a field map: {0}")]
    NotARecord(String),
}
