//! Serve command - run the HTTP upload server.

use std::sync::Arc;

use colored::Colorize;

use crate::config::ServerConfig;
use crate::server::{app, state::AppState};

pub fn run(config: ServerConfig, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr()?;
    let store = Arc::new(super::open_store(&config.data_dir)?);

    println!(
        "{} {}",
        "Dashbase".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).white()
    );
    println!(
        "  {} {} ({} collections)",
        "Data:".yellow(),
        config.data_dir.display(),
        store.len()?
    );
    println!(
        "  {} {}",
        "API: ".yellow(),
        format!("http://{}/api/v1", addr).white().bold()
    );
    if verbose {
        println!(
            "  {} {} bytes",
            "Upload limit:".yellow(),
            config.max_upload_bytes
        );
        if let Some(max) = config.max_results {
            println!("  {} {}", "Result cap:".yellow(), max);
        }
    }
    println!();
    println!("Press {} to stop", "Ctrl+C".white().bold());

    let state = AppState::new(store, config);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, addr))
}
