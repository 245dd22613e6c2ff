//! Dashbase CLI - dataset upload server and local ingestion tool.

mod cli;
mod commands;
mod config;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // A missing .env file is fine; the environment and flags still apply.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            max_upload_bytes,
            max_results,
        } => commands::serve::run(
            config::ServerConfig {
                host,
                port,
                data_dir: cli.data_dir,
                max_upload_bytes,
                max_results,
            },
            cli.verbose,
        ),

        Commands::Ingest {
            file,
            name,
            file_type,
            rfc4180,
        } => commands::ingest::run(file, name, file_type, rfc4180, cli.data_dir, cli.verbose),

        Commands::List { json } => commands::list::run(cli.data_dir, json),

        Commands::Show { name, limit, meta } => {
            commands::show::run(cli.data_dir, name, limit, meta)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "dashbase={lvl},dashbase_cli={lvl},tower_http={lvl}",
            lvl = default_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
