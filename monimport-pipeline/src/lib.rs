//! Tag-scoped import pipeline for monitoring configuration.
//!
//! Pulls commands, hosts, host groups, service templates, services,
//! contacts, time periods and dependency records from a remote,
//! tag-partitioned configuration service and produces a de-duplicated,
//! merged bundle, or writes the service's configuration files to disk.
//!
//! # Architecture
//!
//! - **Source**: the remote service contract, with an XML-RPC client
//! - **Resolver**: expands root tags into their child tags (one level)
//! - **Fetcher**: one call per entity kind per tag, in a fixed order
//! - **Aggregator**: run-wide collections with exact-equality dedup
//! - **Merger**: appends service templates to services
//! - **Sink**: file mode writer, one file per `(tag, file name)`
//! - **Importer**: authenticates once and drives a run
//!
//! # Example
//!
//! ```
//! use monimport_pipeline::{ImportConfig, Importer};
//! use monimport_pipeline::source::mock::MockSource;
//!
//! let config = ImportConfig {
//!     tags: "siteA".to_string(),
//!     ..Default::default()
//! };
//! let importer = Importer::new(MockSource::new("s3ss10n"), config);
//! assert!(importer.session().is_none());
//! ```

pub mod aggregator;
pub mod client;
pub mod config;
mod engine;
mod error;
pub mod fetcher;
pub mod merger;
pub mod policy;
pub mod resolver;
pub mod sink;
pub mod source;
pub mod xmlrpc;

pub use aggregator::Aggregator;
pub use client::{XmlRpcConfig, XmlRpcSource};
pub use config::{ImportConfig, OutputMode};
pub use engine::{ImportOutcome, ImportReport, Importer, KindCount};
pub use error::{ImportError, ImportResult};
pub use merger::merge;
pub use policy::AttributeFilter;
pub use resolver::resolve_tags;
pub use sink::{FileEncoding, FileSink, FileWriteSummary};
pub use source::{RemoteFile, RemoteSource, SessionToken};
