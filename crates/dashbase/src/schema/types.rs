//! Core type definitions for schema representation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Inferred type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number)
    }

    /// Type name used in API summaries, where only numbers are
    /// distinguished from everything else.
    pub fn reported_name(&self) -> &'static str {
        if self.is_numeric() { "number" } else { "string" }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        };
        write!(f, "{}", name)
    }
}

/// Inference result for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// False when the sample value was null and the type is only a fallback.
    pub detected: bool,
}

impl FieldSpec {
    pub fn detected(field_type: FieldType) -> Self {
        Self {
            field_type,
            detected: true,
        }
    }

    pub fn fallback() -> Self {
        Self {
            field_type: FieldType::String,
            detected: false,
        }
    }
}

/// `{name, type}` pair reported to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Field-level schema of a collection, in sample-record order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: IndexMap<String, FieldSpec>,
}

impl FieldSchema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) {
        self.fields.insert(name.into(), spec);
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Flatten to `{name, type}` pairs for external reporting.
    pub fn summary(&self) -> Vec<SchemaField> {
        self.iter()
            .map(|(name, spec)| SchemaField {
                name: name.to_string(),
                field_type: spec.field_type.reported_name().to_string(),
            })
            .collect()
    }
}

impl FromIterator<(String, FieldSpec)> for FieldSchema {
    fn from_iter<I: IntoIterator<Item = (String, FieldSpec)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
