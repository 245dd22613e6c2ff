//! Application state for the web server.

use std::sync::Arc;

use dashbase::{CollectionStore, IngestionCoordinator};

use crate::config::ServerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Runs uploads into the store.
    pub coordinator: IngestionCoordinator,
    /// The collection store, shared with the coordinator.
    pub store: Arc<CollectionStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new application state around an opened store.
    pub fn new(store: Arc<CollectionStore>, config: ServerConfig) -> Self {
        Self {
            coordinator: IngestionCoordinator::new(Arc::clone(&store)),
            store,
            config: Arc::new(config),
        }
    }
}
