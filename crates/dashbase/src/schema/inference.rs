//! Field type inference from a sample record.

use serde_json::Value;

use crate::input::Record;
use super::types::{FieldSchema, FieldSpec, FieldType};

/// Identity field kept even though it carries the reserved prefix.
pub const IDENTITY_FIELD: &str = "_id";

/// Document version counter written by document stores.
pub const VERSION_FIELD: &str = "__v";

const RESERVED_PREFIX: char = '_';

/// Derives a [`FieldSchema`] from one sample record.
///
/// Only the record it is given is examined: heterogeneous later records are
/// neither detected nor reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaInferrer;

impl SchemaInferrer {
    pub fn new() -> Self {
        Self
    }

    /// Classify every non-reserved field of `sample`.
    pub fn infer(&self, sample: &Record) -> FieldSchema {
        sample
            .iter()
            .filter(|(name, _)| !is_reserved(name))
            .map(|(name, value)| (name.clone(), classify(value)))
            .collect()
    }
}

fn is_reserved(name: &str) -> bool {
    name == VERSION_FIELD || (name.starts_with(RESERVED_PREFIX) && name != IDENTITY_FIELD)
}

fn classify(value: &Value) -> FieldSpec {
    match value {
        Value::Null => FieldSpec::fallback(),
        Value::Number(_) => FieldSpec::detected(FieldType::Number),
        Value::Bool(_) => FieldSpec::detected(FieldType::Boolean),
        Value::Array(_) => FieldSpec::detected(FieldType::Array),
        Value::Object(_) => FieldSpec::detected(FieldType::Object),
        Value::String(_) => FieldSpec::detected(FieldType::String),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_infer_all_kinds() {
        let sample = record(json!({
            "age": 30,
            "name": "Al",
            "active": true,
            "tags": [1, 2],
            "meta": {},
            "note": null
        }));

        let schema = SchemaInferrer::new().infer(&sample);

        assert_eq!(schema.len(), 6);
        assert_eq!(schema.get("age"), Some(&FieldSpec::detected(FieldType::Number)));
        assert_eq!(schema.get("name"), Some(&FieldSpec::detected(FieldType::String)));
        assert_eq!(schema.get("active"), Some(&FieldSpec::detected(FieldType::Boolean)));
        assert_eq!(schema.get("tags"), Some(&FieldSpec::detected(FieldType::Array)));
        assert_eq!(schema.get("meta"), Some(&FieldSpec::detected(FieldType::Object)));
        assert_eq!(
            schema.get("note"),
            Some(&FieldSpec {
                field_type: FieldType::String,
                detected: false
            })
        );
    }

    #[test]
    fn test_reserved_fields_skipped_except_identity() {
        let sample = record(json!({
            "_id": "abc",
            "__v": 0,
            "_internal": 1,
            "value": 2
        }));

        let schema = SchemaInferrer::new().infer(&sample);
        let names: Vec<_> = schema.iter().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["_id", "value"]);
    }

    #[test]
    fn test_preserves_field_order() {
        let sample = record(json!({"z": 1, "a": 2, "m": 3}));
        let schema = SchemaInferrer::new().infer(&sample);
        let names: Vec<_> = schema.iter().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["z", "a", "m"]);
    }
}
