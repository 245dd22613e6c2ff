//! Collection metadata and record tables.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::input::{Record, SourceInfo};
use crate::naming::CollectionName;
use crate::schema::{FieldSchema, IDENTITY_FIELD};

/// A record as persisted, with server-assigned identity and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    /// Position of the record within its ingest.
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Fields as parsed from the upload.
    pub data: Record,
}

impl StoredRecord {
    /// Render as a flat document: `_id`, the record's own fields, then the
    /// timestamps. A record that carries its own `_id` keeps it.
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert(IDENTITY_FIELD.to_string(), Value::from(self.id));
        for (name, value) in &self.data {
            doc.insert(name.clone(), value.clone());
        }
        doc.insert("createdAt".to_string(), Value::String(self.created_at.to_rfc3339()));
        doc.insert("updatedAt".to_string(), Value::String(self.updated_at.to_rfc3339()));
        Value::Object(doc)
    }
}

/// The full record set of one collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordTable {
    records: Vec<StoredRecord>,
}

impl RecordTable {
    /// Stamp freshly parsed records for storage.
    pub fn from_records(records: Vec<Record>, now: DateTime<Utc>) -> Self {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(i, data)| StoredRecord {
                id: i as u64,
                created_at: now,
                updated_at: now,
                data,
            })
            .collect();

        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredRecord> {
        self.records.iter()
    }

    /// First `limit` records (all of them when `limit` is None).
    pub fn head(&self, limit: Option<usize>) -> &[StoredRecord] {
        let end = limit.map_or(self.records.len(), |l| l.min(self.records.len()));
        &self.records[..end]
    }

    /// Field data of the first `size` records.
    pub fn sample(&self, size: usize) -> Vec<Record> {
        self.records.iter().take(size).map(|r| r.data.clone()).collect()
    }
}

/// Metadata row of a collection, kept apart from its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMeta {
    pub name: CollectionName,
    pub schema: FieldSchema,
    /// Prefix of the current record set, for previews.
    #[serde(default)]
    pub sample: Vec<Record>,
    #[serde(default)]
    pub record_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A collection as seen by readers: metadata plus a shared handle on the
/// record table it was committed with.
#[derive(Debug, Clone)]
pub struct Collection {
    pub meta: CollectionMeta,
    pub records: Arc<RecordTable>,
}

impl Collection {
    pub fn name(&self) -> &CollectionName {
        &self.meta.name
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.meta.schema
    }

    pub fn record_count(&self) -> usize {
        self.meta.record_count
    }
}

/// Entry in a collection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub name: CollectionName,
    pub record_count: usize,
}

/// Result of `replace_or_create`.
#[derive(Debug, Clone)]
pub struct ReplaceOutcome {
    pub collection: Collection,
    /// True when an existing collection under the same name was superseded.
    pub was_replacement: bool,
}
