//! Named collection store.
//!
//! [`CollectionStore`] is the single source of truth for which collections
//! exist. Each collection is a metadata row plus a separately held record
//! table; both are swapped together under one write lock so readers never
//! see a count that disagrees with the records.

mod backend;
mod collection;
mod locks;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{DashbaseError, Result};
use crate::input::{Record, SourceInfo};
use crate::naming::CollectionName;
use crate::schema::FieldSchema;

pub use backend::{FileSystemBackend, StorageBackend};
pub use collection::{
    Collection, CollectionMeta, CollectionSummary, RecordTable, ReplaceOutcome, StoredRecord,
};
pub use locks::LockRegistry;

/// Default, and largest, number of records kept as a collection preview.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of leading records retained in `CollectionMeta::sample`,
    /// never more than [`DEFAULT_SAMPLE_SIZE`].
    pub sample_size: usize,
}

impl StoreConfig {
    /// Set the preview size. Values above [`DEFAULT_SAMPLE_SIZE`] are capped.
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size.min(DEFAULT_SAMPLE_SIZE);
        self
    }

    fn effective_sample_size(&self) -> usize {
        self.sample_size.min(DEFAULT_SAMPLE_SIZE)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    meta: BTreeMap<CollectionName, CollectionMeta>,
    tables: HashMap<CollectionName, Arc<RecordTable>>,
}

/// Keyed store of collections with replace-on-write semantics.
#[derive(Debug)]
pub struct CollectionStore {
    config: StoreConfig,
    state: RwLock<StoreState>,
    locks: LockRegistry,
    backend: Option<Box<dyn StorageBackend>>,
}

impl CollectionStore {
    /// Create an empty, non-persistent store.
    pub fn in_memory() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty, non-persistent store with custom configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            state: RwLock::new(StoreState::default()),
            locks: LockRegistry::new(),
            backend: None,
        }
    }

    /// Open a store over `backend`, loading everything it holds.
    pub fn open(backend: impl StorageBackend + 'static) -> Result<Self> {
        Self::open_with_config(backend, StoreConfig::default())
    }

    /// Open a store over `backend` with custom configuration.
    pub fn open_with_config(
        backend: impl StorageBackend + 'static,
        config: StoreConfig,
    ) -> Result<Self> {
        let mut state = StoreState::default();
        for (meta, table) in backend.load_all()? {
            let name = meta.name.clone();
            state.tables.insert(name.clone(), Arc::new(table));
            state.meta.insert(name, meta);
        }

        info!(collections = state.meta.len(), "opened collection store");

        Ok(Self {
            config,
            state: RwLock::new(state),
            locks: LockRegistry::new(),
            backend: Some(Box::new(backend)),
        })
    }

    /// Look up a collection. Unknown names are `None`.
    pub fn find(&self, name: &str) -> Result<Option<Collection>> {
        let Some(key) = CollectionName::normalize(name) else {
            return Ok(None);
        };

        let state = self.read_state()?;
        let collection = state.meta.get(&key).map(|meta| Collection {
            meta: meta.clone(),
            records: state.tables.get(&key).cloned().unwrap_or_default(),
        });

        Ok(collection)
    }

    /// Whether a collection exists under `name`.
    pub fn contains(&self, name: &str) -> Result<bool> {
        let Some(key) = CollectionName::normalize(name) else {
            return Ok(false);
        };
        Ok(self.read_state()?.meta.contains_key(&key))
    }

    /// Metadata only; the record table is not touched.
    pub fn get_meta(&self, name: &str) -> Result<Option<CollectionMeta>> {
        let Some(key) = CollectionName::normalize(name) else {
            return Ok(None);
        };
        Ok(self.read_state()?.meta.get(&key).cloned())
    }

    /// Records of a collection, capped at `limit` when given.
    pub fn records(&self, name: &str, limit: Option<usize>) -> Result<Option<Vec<StoredRecord>>> {
        Ok(self
            .find(name)?
            .map(|collection| collection.records.head(limit).to_vec()))
    }

    /// All collections with their record counts, by name ascending.
    pub fn list_all(&self) -> Result<Vec<CollectionSummary>> {
        let state = self.read_state()?;
        Ok(state
            .meta
            .values()
            .map(|meta| CollectionSummary {
                name: meta.name.clone(),
                record_count: meta.record_count,
            })
            .collect())
    }

    /// Number of collections.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_state()?.meta.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Store `records` under `name`, discarding whatever was there.
    ///
    /// Writers to the same name are serialized. The new table and metadata
    /// are built and persisted before anything visible changes; if
    /// persistence fails the previous collection stays as it was.
    pub fn replace_or_create(
        &self,
        name: &CollectionName,
        schema: FieldSchema,
        records: Vec<Record>,
        source: Option<SourceInfo>,
    ) -> Result<ReplaceOutcome> {
        let writer = self.locks.writer(name)?;
        let _guard = writer
            .lock()
            .map_err(|_| DashbaseError::Store(format!("writer lock for '{}' poisoned", name)))?;

        let previous_created_at = self.read_state()?.meta.get(name).map(|m| m.created_at);
        let was_replacement = previous_created_at.is_some();

        let now = Utc::now();
        let table = Arc::new(RecordTable::from_records(records, now));
        let meta = CollectionMeta {
            name: name.clone(),
            schema,
            sample: table.sample(self.config.effective_sample_size()),
            record_count: table.len(),
            source,
            created_at: previous_created_at.unwrap_or(now),
            updated_at: now,
        };

        if let Some(backend) = &self.backend {
            backend.commit(&meta, &table)?;
            debug!(collection = %name, "persisted collection");
        }

        {
            let mut state = self.write_state()?;
            state.tables.insert(name.clone(), Arc::clone(&table));
            state.meta.insert(name.clone(), meta.clone());
        }

        info!(
            collection = %name,
            records = meta.record_count,
            replaced = was_replacement,
            "committed collection"
        );

        Ok(ReplaceOutcome {
            collection: Collection {
                meta,
                records: table,
            },
            was_replacement,
        })
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| DashbaseError::Store("collection registry poisoned".to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| DashbaseError::Store("collection registry poisoned".to_string()))
    }
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
