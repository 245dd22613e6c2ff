//! Integration tests for dashbase.

use std::io::Write;
use std::sync::Arc;

use serde_json::json;
use tempfile::{NamedTempFile, tempdir};

use dashbase::{
    CollectionStore, DashbaseError, FieldSpec, FieldType, FileSystemBackend, FileType,
    IngestRequest, IngestionCoordinator,
};

fn coordinator() -> IngestionCoordinator {
    IngestionCoordinator::new(Arc::new(CollectionStore::in_memory()))
}

fn csv_upload(file_name: &str, content: &str) -> IngestRequest {
    IngestRequest::new(file_name, content).with_type(FileType::Csv)
}

// =============================================================================
// Ingestion
// =============================================================================

#[test]
fn test_csv_quoting_end_to_end() {
    let coordinator = coordinator();
    let summary = coordinator
        .ingest(csv_upload("quoted.csv", "\"a,b\",c\n1,2"))
        .expect("ingest failed");

    assert_eq!(summary.record_count, 1);

    let collection = coordinator.store().find("quoted").unwrap().unwrap();
    let record = &collection.records.iter().next().unwrap().data;
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a,b", "c"]);
    assert_eq!(record["a,b"], json!(1));
    assert_eq!(record["c"], json!(2));
}

#[test]
fn test_replace_leaves_only_new_dataset() {
    let coordinator = coordinator();

    let first = coordinator
        .ingest(csv_upload("a.csv", "k,v\n1,old\n2,old\n3,old").with_collection_name("X"))
        .unwrap();
    let second = coordinator
        .ingest(csv_upload("b.csv", "k,v,extra\n9,new,yes").with_collection_name("X"))
        .unwrap();

    assert!(!first.was_replacement);
    assert!(second.was_replacement);
    assert_eq!(second.record_count, 1);

    let collection = coordinator.store().find("x").unwrap().unwrap();
    assert_eq!(collection.record_count(), 1);
    assert_eq!(collection.records.len(), 1);
    assert_eq!(collection.meta.sample.len(), 1);
    assert!(collection.schema().get("extra").is_some());
    assert!(
        collection
            .records
            .iter()
            .all(|r| r.data["v"] == json!("new"))
    );
}

#[test]
fn test_idempotent_reingest() {
    let coordinator = coordinator();
    let content = r#"[{"id":1,"name":"a"},{"id":2,"name":"b"}]"#;

    let first = coordinator
        .ingest(IngestRequest::new("same.json", content))
        .unwrap();
    let second = coordinator
        .ingest(IngestRequest::new("same.json", content))
        .unwrap();

    assert!(!first.was_replacement);
    assert!(second.was_replacement);
    assert_eq!(first.schema, second.schema);
    assert_eq!(first.field_schema, second.field_schema);
    assert_eq!(first.record_count, second.record_count);
    assert_eq!(coordinator.store().len().unwrap(), 1);
}

#[test]
fn test_schema_from_first_record_only() {
    let coordinator = coordinator();
    let content = r#"[
        {"age": 30, "name": "Al", "active": true, "tags": [1,2], "meta": {}, "note": null},
        {"age": "thirty", "other": 1}
    ]"#;

    let summary = coordinator
        .ingest(IngestRequest::new("people.json", content))
        .unwrap();
    let schema = &summary.field_schema;

    assert_eq!(schema.len(), 6);
    assert_eq!(schema.get("age"), Some(&FieldSpec::detected(FieldType::Number)));
    assert_eq!(schema.get("name"), Some(&FieldSpec::detected(FieldType::String)));
    assert_eq!(schema.get("active"), Some(&FieldSpec::detected(FieldType::Boolean)));
    assert_eq!(schema.get("tags"), Some(&FieldSpec::detected(FieldType::Array)));
    assert_eq!(schema.get("meta"), Some(&FieldSpec::detected(FieldType::Object)));
    assert_eq!(schema.get("note"), Some(&FieldSpec::fallback()));
    assert!(schema.get("other").is_none());
}

#[test]
fn test_name_resolution_from_file_name() {
    let summary = coordinator()
        .ingest(csv_upload("My Report!!.CSV", "a\n1"))
        .unwrap();
    assert_eq!(summary.collection_name.as_str(), "my_report__");
}

#[test]
fn test_generated_name_when_nothing_usable() {
    let summary = coordinator()
        .ingest(IngestRequest::new(".json", r#"{"a":1}"#).with_type(FileType::Json))
        .unwrap();
    assert!(summary.collection_name.as_str().starts_with("uploaded_"));
}

// =============================================================================
// Error Handling
// =============================================================================

#[test]
fn test_header_only_csv_rejected() {
    let coordinator = coordinator();
    let err = coordinator
        .ingest(csv_upload("header.csv", "id,name\n"))
        .unwrap_err();

    assert!(matches!(err, DashbaseError::Parse { .. }));
    assert!(coordinator.store().find("header").unwrap().is_none());
}

#[test]
fn test_unsupported_format() {
    let err = coordinator()
        .ingest(IngestRequest::new("notes.txt", "hello"))
        .unwrap_err();
    assert!(matches!(err, DashbaseError::UnsupportedFormat(_)));
    assert!(err.is_user_error());
}

#[test]
fn test_empty_json_dataset() {
    let err = coordinator()
        .ingest(IngestRequest::new("empty.json", r#"{"data": []}"#))
        .unwrap_err();
    assert!(matches!(err, DashbaseError::EmptyDataset(_)));
}

#[test]
fn test_failed_reingest_keeps_existing_collection() {
    let coordinator = coordinator();
    coordinator
        .ingest(csv_upload("keep.csv", "a\n1\n2"))
        .unwrap();

    let err = coordinator
        .ingest(IngestRequest::new("keep.json", "{broken"))
        .unwrap_err();
    assert!(matches!(err, DashbaseError::Parse { .. }));

    let collection = coordinator.store().find("keep").unwrap().unwrap();
    assert_eq!(collection.record_count(), 2);
}

#[test]
fn test_unknown_collection_read() {
    let store = CollectionStore::in_memory();
    assert!(store.find("nonexistent").unwrap().is_none());
}

#[test]
fn test_ingest_path_io_error() {
    let err = coordinator()
        .ingest_path("/definitely/not/here.csv", None)
        .unwrap_err();
    assert!(matches!(err, DashbaseError::Io { .. }));
}

#[test]
fn test_ingest_path_uses_extension() {
    let mut file = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    file.write_all(b"city,pop\nOslo,700000\n").unwrap();

    let summary = coordinator()
        .ingest_path(file.path(), Some("cities"))
        .unwrap();
    assert_eq!(summary.collection_name.as_str(), "cities");
    assert_eq!(summary.record_count, 1);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_filesystem_store_survives_reopen() {
    let dir = tempdir().unwrap();

    {
        let backend = FileSystemBackend::create(dir.path()).unwrap();
        let store = CollectionStore::open(backend).unwrap();
        let coordinator = IngestionCoordinator::new(Arc::new(store));
        coordinator
            .ingest(csv_upload("sales.csv", "region,total\nnorth,10\nsouth,20"))
            .unwrap();
        coordinator
            .ingest(csv_upload("sales.csv", "region,total\neast,5"))
            .unwrap();
        coordinator
            .ingest(IngestRequest::new("users.json", r#"[{"u":"a"}]"#))
            .unwrap();
    }

    let backend = FileSystemBackend::create(dir.path()).unwrap();
    let store = CollectionStore::open(backend).unwrap();

    let names: Vec<_> = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|s| (s.name.to_string(), s.record_count))
        .collect();
    assert_eq!(names, vec![("sales".to_string(), 1), ("users".to_string(), 1)]);

    let sales = store.find("sales").unwrap().unwrap();
    assert_eq!(sales.records.iter().next().unwrap().data["region"], json!("east"));
    assert_eq!(sales.meta.source.as_ref().unwrap().format, FileType::Csv);
    assert!(sales.meta.created_at <= sales.meta.updated_at);
}

#[test]
fn test_failed_filesystem_ingest_keeps_previous_collection() {
    let dir = tempdir().unwrap();
    let open = || {
        let backend = FileSystemBackend::create(dir.path()).unwrap();
        IngestionCoordinator::new(Arc::new(CollectionStore::open(backend).unwrap()))
    };

    let coordinator = open();
    coordinator
        .ingest(csv_upload("inventory.csv", "old_field\nold-0\nold-1\nold-2"))
        .unwrap();

    // Occupy the staging path so the metadata switch cannot happen.
    let blocker = dir.path().join("meta").join("inventory.json.tmp");
    std::fs::create_dir(&blocker).unwrap();

    let err = coordinator
        .ingest(csv_upload("inventory.csv", "new_field\nnew-0\nnew-1"))
        .unwrap_err();
    assert!(matches!(err, DashbaseError::Store(_)));

    let in_memory = coordinator.store().find("inventory").unwrap().unwrap();
    assert_eq!(in_memory.record_count(), 3);

    std::fs::remove_dir(&blocker).unwrap();
    drop(coordinator);

    let reopened = open();
    let collection = reopened.store().find("inventory").unwrap().unwrap();
    let first = &collection.records.iter().next().unwrap().data;

    assert_eq!(collection.record_count(), 3);
    assert_eq!(collection.records.len(), 3);
    assert!(collection.schema().get("old_field").is_some());
    assert!(collection.schema().get("new_field").is_none());
    assert_eq!(collection.meta.sample[0], *first);
    assert_eq!(first["old_field"], json!("old-0"));

    let record_files = std::fs::read_dir(dir.path().join("records")).unwrap().count();
    assert_eq!(record_files, 1);
}
