//! Example: Ingest a CSV or JSON file and print the inferred schema.
//!
//! Usage:
//!   cargo run --example ingest -- <file_path> [collection_name]

use std::env;
use std::sync::Arc;

use dashbase::{CollectionStore, IngestionCoordinator};

fn main() -> dashbase::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example ingest -- <file_path> [collection_name]");
        std::process::exit(1);
    }

    let store = Arc::new(CollectionStore::in_memory());
    let coordinator = IngestionCoordinator::new(store.clone());

    let summary = coordinator.ingest_path(&args[1], args.get(2).map(String::as_str))?;

    println!("Collection: {}", summary.collection_name);
    println!("Records:    {}", summary.record_count);
    println!("\nSchema:");
    for field in &summary.schema {
        println!("  {:24} {}", field.name, field.field_type);
    }

    if let Some(collection) = store.find(summary.collection_name.as_str())? {
        println!("\nFirst records:");
        for record in collection.records.head(Some(3)) {
            println!("  {}", record.to_document());
        }
    }

    Ok(())
}
