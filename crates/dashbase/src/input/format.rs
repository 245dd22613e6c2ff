//! Upload format selection.

use serde::{Deserialize, Serialize};

use crate::error::{DashbaseError, Result};

/// Declared or resolved format of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum FileType {
    Csv,
    Json,
    /// Not declared, or declared as something we do not recognise.
    #[default]
    Unknown,
}

impl FileType {
    /// Interpret a caller-declared type. Accepts bare names and the MIME
    /// types browsers attach to file inputs; anything else is `Unknown`.
    pub fn from_declared(declared: &str) -> Self {
        match declared.trim().to_ascii_lowercase().as_str() {
            "csv" | "text/csv" => FileType::Csv,
            "json" | "application/json" => FileType::Json,
            _ => FileType::Unknown,
        }
    }

    /// Guess the format from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.trim().to_ascii_lowercase();
        if lower.ends_with(".csv") {
            FileType::Csv
        } else if lower.ends_with(".json") {
            FileType::Json
        } else {
            FileType::Unknown
        }
    }

    /// Pick the format to parse with: the declaration wins, then the
    /// extension.
    pub fn resolve(self, file_name: &str) -> Result<FileType> {
        match self {
            FileType::Csv | FileType::Json => Ok(self),
            FileType::Unknown => match FileType::from_file_name(file_name) {
                FileType::Unknown => Err(DashbaseError::UnsupportedFormat(format!(
                    "cannot determine format of '{}'; expected csv or json",
                    file_name
                ))),
                resolved => Ok(resolved),
            },
        }
    }
}

impl std::str::FromStr for FileType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(FileType::from_declared(s))
    }
}

impl From<String> for FileType {
    fn from(declared: String) -> Self {
        FileType::from_declared(&declared)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Csv => write!(f, "csv"),
            FileType::Json => write!(f, "json"),
            FileType::Unknown => write!(f, "unknown"),
        }
    }
}
