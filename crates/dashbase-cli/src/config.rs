//! Resolved server configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Settings for the HTTP upload server, resolved from flags, the
/// environment and `.env`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding persisted collections.
    pub data_dir: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// Cap on records returned by a collection read.
    pub max_results: Option<usize>,
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| format!("Invalid host '{}': {}", self.host, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Effective record cap for a read: the smaller of the requested
    /// limit and the configured maximum.
    pub fn effective_limit(&self, requested: Option<usize>) -> Option<usize> {
        match (requested, self.max_results) {
            (Some(r), Some(m)) => Some(r.min(m)),
            (Some(r), None) => Some(r),
            (None, m) => m,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            data_dir: PathBuf::from("data"),
            max_upload_bytes: 16 * 1024 * 1024,
            max_results: None,
        }
    }
}
