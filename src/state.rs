//! Application state for Typeshift.
//!
//! Contains the shared state that is passed to all handlers. Nothing in it is
//! mutable per request; request-scoped accounting lives in the services.

use std::sync::Arc;

use crate::config::MigrationSettings;
use crate::services::{ContentRepository, KontentClient, MigrationService, TypeCatalogService};
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Type migration service.
    pub migration: MigrationService,
    /// Type listing service.
    pub types: TypeCatalogService,
}

impl AppState {
    /// Create the application state from the global configuration.
    pub fn new() -> Result<Self> {
        let config = config::config();
        let client = KontentClient::new(&config.kontent)?;
        Ok(Self::with_repository(
            Arc::new(client),
            config.migration.clone(),
        ))
    }

    /// Create the application state over an explicit repository.
    pub fn with_repository(
        repository: Arc<dyn ContentRepository>,
        settings: MigrationSettings,
    ) -> Self {
        Self {
            migration: MigrationService::new(repository.clone(), settings),
            types: TypeCatalogService::new(repository),
        }
    }
}
