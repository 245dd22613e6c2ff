//! List command - show stored collections.

use std::path::PathBuf;

use colored::Colorize;

pub fn run(data_dir: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(&data_dir)?;
    let collections = store.list_all()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&collections)?);
        return Ok(());
    }

    if collections.is_empty() {
        println!("{}", "No collections yet".yellow());
        return Ok(());
    }

    println!(
        "{} {}",
        collections.len().to_string().white().bold(),
        "collections".cyan()
    );
    for summary in &collections {
        println!(
            "  {:32} {:>8} records",
            summary.name.to_string().white(),
            summary.record_count
        );
    }

    Ok(())
}
