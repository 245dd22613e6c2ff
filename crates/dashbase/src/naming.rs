//! Collection identifier derivation and validation.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_]+$").unwrap());

static DATA_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.(csv|json)$").unwrap());

/// Prefix of generated names when neither input is usable.
pub const FALLBACK_PREFIX: &str = "uploaded_";

/// A validated collection identifier: non-empty, lowercase `[a-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Accept an identifier that is already in canonical form.
    pub fn parse(name: &str) -> Option<Self> {
        if IDENTIFIER_PATTERN.is_match(name) {
            Some(Self(name.to_string()))
        } else {
            None
        }
    }

    /// Lowercase and replace every character outside `[a-z0-9]` with `_`.
    /// Returns `None` for blank input.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let normalized: String = trimmed
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
            .collect();

        Some(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CollectionName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CollectionName::parse(&value).ok_or_else(|| format!("invalid collection name '{}'", value))
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> Self {
        name.0
    }
}

/// Picks the collection name for an upload.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionNameResolver;

impl CollectionNameResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve using the current time for the generated fallback.
    pub fn resolve(&self, user_supplied: Option<&str>, file_name: Option<&str>) -> CollectionName {
        self.resolve_at(user_supplied, file_name, Utc::now().timestamp_millis())
    }

    /// Resolve in order: explicit name, file name without its data
    /// extension, then `uploaded_<epoch_millis>`.
    pub fn resolve_at(
        &self,
        user_supplied: Option<&str>,
        file_name: Option<&str>,
        epoch_millis: i64,
    ) -> CollectionName {
        if let Some(name) = user_supplied.and_then(CollectionName::normalize) {
            return name;
        }

        if let Some(name) = file_name
            .map(|f| DATA_EXTENSION.replace(f.trim(), ""))
            .and_then(|stem| CollectionName::normalize(&stem))
        {
            return name;
        }

        CollectionName(format!("{}{}", FALLBACK_PREFIX, epoch_millis))
    }
}
