//! Durable storage for collections.
//!
//! The store keeps every collection in memory and hands each committed
//! replacement to a [`StorageBackend`] first, so a restart can reload it.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DashbaseError, Result};
use crate::naming::CollectionName;

use super::collection::{CollectionMeta, RecordTable};

const META_DIR: &str = "meta";
const RECORDS_DIR: &str = "records";
const TMP_SUFFIX: &str = "tmp";

/// Persistence seam for [`super::CollectionStore`].
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Load every persisted collection.
    fn load_all(&self) -> Result<Vec<(CollectionMeta, RecordTable)>>;

    /// Durably replace the stored metadata and records of `meta.name`.
    fn commit(&self, meta: &CollectionMeta, records: &RecordTable) -> Result<()>;
}

/// Stores metadata and records as JSON files in separate directories:
///
/// ```text
/// <root>/
/// ├── meta/<name>.json                 # CollectionMeta + current records file
/// └── records/<name>.<generation>.json # RecordTable
/// ```
///
/// Each commit writes a fresh records generation, then renames the metadata
/// file over the old one. That rename is the only step that changes what a
/// reload sees, so an interrupted commit leaves the previous collection
/// whole. The superseded generation is deleted afterwards.
#[derive(Debug, Clone)]
pub struct FileSystemBackend {
    root: PathBuf,
}

/// On-disk form of a metadata file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaDocument {
    meta: CollectionMeta,
    records_file: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetaDocumentRef<'a> {
    meta: &'a CollectionMeta,
    records_file: &'a str,
}

/// A commit whose records are on disk but not yet referenced.
#[derive(Debug)]
struct StagedCommit {
    meta_tmp: PathBuf,
    meta_path: PathBuf,
    records_path: PathBuf,
    records_file: String,
}

impl FileSystemBackend {
    /// Use `root` as the data directory, creating it if needed.
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        for dir in [root.join(META_DIR), root.join(RECORDS_DIR)] {
            fs::create_dir_all(&dir).map_err(|e| {
                DashbaseError::Store(format!(
                    "Failed to create directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn meta_path(&self, name: &CollectionName) -> PathBuf {
        self.root.join(META_DIR).join(format!("{}.json", name))
    }

    fn records_dir(&self) -> PathBuf {
        self.root.join(RECORDS_DIR)
    }

    /// Records file referenced by the current metadata of `name`, if any.
    fn current_records_file(&self, name: &CollectionName) -> Option<String> {
        let meta_path = self.meta_path(name);
        if !meta_path.exists() {
            return None;
        }

        match read_json::<MetaDocument>(&meta_path) {
            Ok(doc) => Some(doc.records_file),
            Err(e) => {
                warn!(collection = %name, error = %e, "unreadable metadata, old records kept");
                None
            }
        }
    }

    /// Pick an unused `<name>.<generation>.json` file name.
    fn next_records_file(&self, meta: &CollectionMeta) -> String {
        let dir = self.records_dir();
        let mut generation = meta.updated_at.timestamp_micros();
        loop {
            let file = format!("{}.{}.json", meta.name, generation);
            if !dir.join(&file).exists() {
                return file;
            }
            generation += 1;
        }
    }

    /// Write the new records generation and the staged metadata. Nothing a
    /// reload reads has changed when this returns.
    fn stage(&self, meta: &CollectionMeta, records: &RecordTable) -> Result<StagedCommit> {
        let records_file = self.next_records_file(meta);
        let records_path = self.records_dir().join(&records_file);

        let records_tmp = write_json_tmp(&records_path, records)?;
        if let Err(e) = rename(&records_tmp, &records_path) {
            remove_quietly(&records_tmp);
            return Err(e);
        }

        let meta_path = self.meta_path(&meta.name);
        let document = MetaDocumentRef {
            meta,
            records_file: &records_file,
        };
        let meta_tmp = match write_json_tmp(&meta_path, &document) {
            Ok(tmp) => tmp,
            Err(e) => {
                remove_quietly(&records_path);
                return Err(e);
            }
        };

        Ok(StagedCommit {
            meta_tmp,
            meta_path,
            records_path,
            records_file,
        })
    }

    /// Switch the metadata over to the staged generation, then drop the
    /// generation it replaced.
    fn publish(&self, staged: StagedCommit, previous: Option<String>) -> Result<()> {
        if let Err(e) = rename(&staged.meta_tmp, &staged.meta_path) {
            remove_quietly(&staged.meta_tmp);
            remove_quietly(&staged.records_path);
            return Err(e);
        }

        if let Some(previous) = previous.filter(|p| *p != staged.records_file) {
            let old = self.records_dir().join(previous);
            if let Err(e) = fs::remove_file(&old) {
                warn!(path = %old.display(), error = %e, "failed to remove superseded records");
            }
        }

        Ok(())
    }

    fn load_one(&self, meta_path: &Path) -> Result<(CollectionMeta, RecordTable)> {
        let MetaDocument {
            mut meta,
            records_file,
        } = read_json(meta_path)?;
        let records_path = self.records_dir().join(&records_file);

        let records = if records_path.exists() {
            read_json(&records_path)?
        } else {
            warn!(
                collection = %meta.name,
                file = %records_file,
                "record file missing, loading as empty"
            );
            RecordTable::default()
        };

        if meta.record_count != records.len() {
            warn!(
                collection = %meta.name,
                stored = meta.record_count,
                actual = records.len(),
                "record count out of sync with record file, reconciling"
            );
            meta.record_count = records.len();
        }

        Ok((meta, records))
    }
}

impl StorageBackend for FileSystemBackend {
    fn load_all(&self) -> Result<Vec<(CollectionMeta, RecordTable)>> {
        let meta_dir = self.root.join(META_DIR);
        let entries = fs::read_dir(&meta_dir).map_err(|e| {
            DashbaseError::Store(format!(
                "Failed to read directory '{}': {}",
                meta_dir.display(),
                e
            ))
        })?;

        let mut loaded = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| DashbaseError::Store(format!("Failed to list metadata: {}", e)))?
                .path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                loaded.push(self.load_one(&path)?);
            } else {
                debug!(path = %path.display(), "skipping non-metadata file");
            }
        }

        Ok(loaded)
    }

    fn commit(&self, meta: &CollectionMeta, records: &RecordTable) -> Result<()> {
        let previous = self.current_records_file(&meta.name);
        let staged = self.stage(meta, records)?;
        self.publish(staged, previous)
    }
}

/// Serialize `value` next to `path` as `<path>.tmp`. The temp file is
/// removed again if writing fails.
fn write_json_tmp<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let tmp = path.with_extension(format!("json.{}", TMP_SUFFIX));

    let file = File::create(&tmp).map_err(|e| {
        DashbaseError::Store(format!("Failed to create file '{}': {}", tmp.display(), e))
    })?;

    let mut writer = BufWriter::new(file);
    let written = serde_json::to_writer(&mut writer, value)
        .map_err(|e| {
            DashbaseError::Store(format!("Failed to serialize '{}': {}", tmp.display(), e))
        })
        .and_then(|_| {
            writer.flush().map_err(|e| {
                DashbaseError::Store(format!("Failed to write '{}': {}", tmp.display(), e))
            })
        });
    drop(writer);

    match written {
        Ok(()) => Ok(tmp),
        Err(e) => {
            remove_quietly(&tmp);
            Err(e)
        }
    }
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|e| {
        DashbaseError::Store(format!(
            "Failed to move '{}' to '{}': {}",
            from.display(),
            to.display(),
            e
        ))
    })
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        debug!(path = %path.display(), error = %e, "cleanup failed");
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| {
        DashbaseError::Store(format!("Failed to open file '{}': {}", path.display(), e))
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        DashbaseError::Store(format!("Failed to parse '{}': {}", path.display(), e))
    })
}
