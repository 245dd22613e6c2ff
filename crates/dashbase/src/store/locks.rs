//! Per-collection writer locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{DashbaseError, Result};
use crate::naming::CollectionName;

/// Lazily created writer lock per collection name.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<CollectionName, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (creating on first use) the writer lock for `name`.
    pub fn writer(&self, name: &CollectionName) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| DashbaseError::Store("lock registry poisoned".to_string()))?;

        Ok(locks
            .entry(name.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}
