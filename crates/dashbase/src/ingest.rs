//! Upload ingestion: parse, infer, name, and commit.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DashbaseError, Result};
use crate::input::{FileType, ParserConfig, SourceInfo, TextParser};
use crate::naming::{CollectionName, CollectionNameResolver};
use crate::schema::{FieldSchema, SchemaField, SchemaInferrer};
use crate::store::CollectionStore;

/// Configuration for the ingestion pipeline.
#[derive(Debug, Clone, Default)]
pub struct IngestConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
}

impl IngestConfig {
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }
}

/// One upload to ingest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub file_name: String,
    pub file_content: String,
    #[serde(default)]
    pub file_type: FileType,
    /// Explicit collection name; derived from `file_name` when absent.
    #[serde(default)]
    pub collection_name: Option<String>,
}

impl IngestRequest {
    pub fn new(file_name: impl Into<String>, file_content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            file_content: file_content.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }
}

/// Outcome of a successful ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub collection_name: CollectionName,
    /// Reported schema: numbers vs. everything else.
    pub schema: Vec<SchemaField>,
    /// Full inferred schema as stored on the collection.
    #[serde(skip)]
    pub field_schema: FieldSchema,
    pub record_count: usize,
    pub was_replacement: bool,
}

/// Runs uploads through parsing, inference and naming, then commits them
/// to a shared [`CollectionStore`].
#[derive(Debug, Clone)]
pub struct IngestionCoordinator {
    parser: TextParser,
    inferrer: SchemaInferrer,
    resolver: CollectionNameResolver,
    store: Arc<CollectionStore>,
}

impl IngestionCoordinator {
    /// Create a coordinator with default configuration.
    pub fn new(store: Arc<CollectionStore>) -> Self {
        Self::with_config(store, IngestConfig::default())
    }

    /// Create a coordinator with custom configuration.
    pub fn with_config(store: Arc<CollectionStore>, config: IngestConfig) -> Self {
        Self {
            parser: TextParser::with_config(config.parser),
            inferrer: SchemaInferrer::new(),
            resolver: CollectionNameResolver::new(),
            store,
        }
    }

    /// The store this coordinator writes to.
    pub fn store(&self) -> &Arc<CollectionStore> {
        &self.store
    }

    /// Ingest one upload, replacing any collection of the resolved name.
    pub fn ingest(&self, request: IngestRequest) -> Result<IngestSummary> {
        if request.file_content.trim().is_empty() {
            return Err(DashbaseError::parse("missing file content"));
        }

        let format = request.file_type.resolve(&request.file_name)?;
        let records = self
            .parser
            .parse(&request.file_content, format, &request.file_name)?;

        let Some(first) = records.first() else {
            return Err(DashbaseError::EmptyDataset(request.file_name));
        };
        let schema = self.inferrer.infer(first);
        debug!(fields = schema.len(), "inferred schema from first record");

        let name = self.resolver.resolve(
            request.collection_name.as_deref(),
            Some(request.file_name.as_str()),
        );

        let source = SourceInfo::new(request.file_name.as_str(), format, &request.file_content);
        let outcome = self
            .store
            .replace_or_create(&name, schema, records, Some(source))?;

        let meta = outcome.collection.meta;
        info!(
            collection = %name,
            records = meta.record_count,
            replaced = outcome.was_replacement,
            "ingested upload"
        );

        Ok(IngestSummary {
            collection_name: name,
            schema: meta.schema.summary(),
            field_schema: meta.schema,
            record_count: meta.record_count,
            was_replacement: outcome.was_replacement,
        })
    }

    /// Read a local file and ingest it, taking the format from its
    /// extension.
    pub fn ingest_path(
        &self,
        path: impl AsRef<Path>,
        collection_name: Option<&str>,
    ) -> Result<IngestSummary> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| DashbaseError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut request = IngestRequest::new(file_name, content);
        request.collection_name = collection_name.map(str::to_string);

        self.ingest(request)
    }
}
