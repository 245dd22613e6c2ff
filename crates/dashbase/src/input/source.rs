//! Record representation and upload fingerprinting.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::format::FileType;

/// One parsed row/document, with fields in source order.
pub type Record = IndexMap<String, Value>;

/// Metadata about the upload a collection was last built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    /// File name as supplied by the caller.
    pub file_name: String,
    /// Format the content was parsed as.
    pub format: FileType,
    /// Content size in bytes.
    pub size_bytes: u64,
    /// SHA-256 hash of the content.
    pub hash: String,
}

impl SourceInfo {
    /// Fingerprint uploaded content.
    pub fn new(file_name: impl Into<String>, format: FileType, content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            file_name: file_name.into(),
            format,
            size_bytes: content.len() as u64,
            hash,
        }
    }
}
