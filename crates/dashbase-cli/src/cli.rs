//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dashbase::FileType;

/// Dashbase: upload CSV/JSON datasets into named collections
#[derive(Parser)]
#[command(name = "dashbase")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding persisted collections
    #[arg(short, long, global = true, env = "DASHBASE_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP upload server
    Serve {
        /// Address to bind
        #[arg(long, env = "DASHBASE_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port for web server
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,

        /// Largest accepted request body, in bytes
        #[arg(long, env = "DASHBASE_MAX_UPLOAD_BYTES", default_value = "16777216")]
        max_upload_bytes: usize,

        /// Cap on records returned by a collection read
        #[arg(long, env = "DASHBASE_MAX_RESULTS")]
        max_results: Option<usize>,
    },

    /// Ingest a local CSV/JSON file, replacing any collection of the same name
    Ingest {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Collection name (default: derived from the file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Format override (csv or json)
        #[arg(short = 't', long = "type")]
        file_type: Option<FileType>,

        /// Use RFC 4180 CSV quoting (doubled quotes, quoted newlines)
        #[arg(long)]
        rfc4180: bool,
    },

    /// List collections and their record counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a collection's metadata and records
    Show {
        /// Collection name
        #[arg(value_name = "NAME")]
        name: String,

        /// Maximum records to print
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Print metadata only
        #[arg(long)]
        meta: bool,
    },
}
