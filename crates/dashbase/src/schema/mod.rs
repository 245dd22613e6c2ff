//! Schema types and inference.

mod inference;
mod types;

pub use inference::{IDENTITY_FIELD, SchemaInferrer, VERSION_FIELD};
pub use types::{FieldSchema, FieldSpec, FieldType, SchemaField};
