use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repos::ownership::OwnershipStore;
use crate::state::security_config::SecurityConfig;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// The ownership store behind every route and the background repair task
    pub store: Arc<dyn OwnershipStore>,
    /// Raw connection, kept for health/migration probes only; `None` when the
    /// store is not database-backed (tests, local dev on the memory store)
    pub db: Option<DatabaseConnection>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
}

impl AppState {
    /// Create a new AppState with the given store, connection and security config
    pub fn new(
        store: Arc<dyn OwnershipStore>,
        db: DatabaseConnection,
        security: SecurityConfig,
    ) -> Self {
        Self {
            store,
            db: Some(db),
            security,
        }
    }

    /// Create a new AppState without a database connection
    pub fn without_db(store: Arc<dyn OwnershipStore>, security: SecurityConfig) -> Self {
        Self {
            store,
            db: None,
            security,
        }
    }
}
