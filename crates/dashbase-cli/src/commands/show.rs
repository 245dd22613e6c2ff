//! Show command - print a collection's metadata and leading records.

use std::path::PathBuf;

use colored::Colorize;
use dashbase::{DashbaseError, StoredRecord};

pub fn run(
    data_dir: PathBuf,
    name: String,
    limit: usize,
    meta_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(&data_dir)?;
    let collection = store
        .find(&name)?
        .ok_or_else(|| DashbaseError::NotFound(name.clone()))?;
    let meta = &collection.meta;

    println!(
        "{} {}",
        "Collection".cyan().bold(),
        meta.name.to_string().white().bold()
    );
    println!("  Records: {}", meta.record_count);
    println!("  Created: {}", meta.created_at.to_rfc3339());
    println!("  Updated: {}", meta.updated_at.to_rfc3339());
    if let Some(source) = &meta.source {
        println!(
            "  Source:  {} ({}, {} bytes)",
            source.file_name, source.format, source.size_bytes
        );
    }

    println!();
    println!("{}", "Schema:".yellow().bold());
    for field in meta.schema.summary() {
        println!("  {:24} {}", field.name, field.field_type);
    }

    if meta_only {
        return Ok(());
    }

    let documents: Vec<serde_json::Value> = collection
        .records
        .head(Some(limit))
        .iter()
        .map(StoredRecord::to_document)
        .collect();

    println!();
    println!(
        "{} ({} of {})",
        "Records:".yellow().bold(),
        documents.len(),
        meta.record_count
    );
    println!("{}", serde_json::to_string_pretty(&documents)?);

    Ok(())
}
