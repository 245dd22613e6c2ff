//! CLI command implementations.

pub mod ingest;
pub mod list;
pub mod serve;
pub mod show;

use std::path::Path;

use dashbase::{CollectionStore, FileSystemBackend};

/// Open the persisted store rooted at `data_dir`, creating it if needed.
pub(crate) fn open_store(data_dir: &Path) -> Result<CollectionStore, Box<dyn std::error::Error>> {
    let backend = FileSystemBackend::create(data_dir)?;
    Ok(CollectionStore::open(backend)?)
}
