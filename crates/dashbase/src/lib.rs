//! Dashbase: dataset ingestion into a named collection store.
//!
//! Uploaded CSV or JSON text is parsed into records, a field schema is
//! inferred from the first record, and the records are stored as a named
//! collection that fully replaces any earlier collection of the same name.
//!
//! # Core Principles
//!
//! - **Replace, never merge**: re-uploading under a name discards the old records
//! - **Consistent reads**: a collection's record count always matches its records
//! - **Best effort**: schema inference looks at one sample record only
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dashbase::{CollectionStore, IngestRequest, IngestionCoordinator};
//!
//! let store = Arc::new(CollectionStore::in_memory());
//! let coordinator = IngestionCoordinator::new(store.clone());
//!
//! let summary = coordinator
//!     .ingest(IngestRequest::new("people.csv", "name,age\nAl,30\n"))
//!     .unwrap();
//!
//! println!("Collection: {}", summary.collection_name);
//! println!("Records: {}", summary.record_count);
//! ```

pub mod error;
pub mod ingest;
pub mod input;
pub mod naming;
pub mod schema;
pub mod store;

pub use error::{DashbaseError, Result};
pub use ingest::{IngestConfig, IngestRequest, IngestSummary, IngestionCoordinator};
pub use input::{CsvDialect, FileType, ParserConfig, Record, SourceInfo, TextParser};
pub use naming::{CollectionName, CollectionNameResolver};
pub use schema::{FieldSchema, FieldSpec, FieldType, SchemaField, SchemaInferrer};
pub use store::{
    Collection, CollectionMeta, CollectionStore, CollectionSummary, FileSystemBackend,
    ReplaceOutcome, StorageBackend, StoreConfig, StoredRecord,
};
