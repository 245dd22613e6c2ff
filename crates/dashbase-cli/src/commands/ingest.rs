//! Ingest command - load a local file into a collection.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use dashbase::{
    CsvDialect, FileType, IngestConfig, IngestRequest, IngestionCoordinator, ParserConfig,
};

pub fn run(
    file: PathBuf,
    name: Option<String>,
    file_type: Option<FileType>,
    rfc4180: bool,
    data_dir: PathBuf,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let store = Arc::new(super::open_store(&data_dir)?);
    let dialect = if rfc4180 {
        CsvDialect::Rfc4180
    } else {
        CsvDialect::Simple
    };
    let config =
        IngestConfig::default().with_parser(ParserConfig::default().with_csv_dialect(dialect));
    let coordinator = IngestionCoordinator::with_config(store, config);

    println!(
        "{} {}",
        "Ingesting".cyan().bold(),
        file.display().to_string().white()
    );

    let summary = match file_type {
        Some(file_type) => {
            let content = fs::read_to_string(&file)?;
            let file_name = file
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut request = IngestRequest::new(file_name, content).with_type(file_type);
            request.collection_name = name;
            coordinator.ingest(request)?
        }
        None => coordinator.ingest_path(&file, name.as_deref())?,
    };

    if verbose {
        println!();
        println!("{}", "Schema:".yellow().bold());
        for field in &summary.schema {
            println!("  {:24} {}", field.name, field.field_type);
        }
        println!();
    }

    let verb = if summary.was_replacement {
        "Replaced"
    } else {
        "Created"
    };
    println!(
        "{} {} with {} records and {} fields",
        verb.green().bold(),
        summary.collection_name.to_string().white().bold(),
        summary.record_count,
        summary.schema.len()
    );

    Ok(())
}
