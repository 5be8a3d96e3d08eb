//! Test database utilities for in-memory SQLite testing

use std::sync::Arc;

use anyhow::Result;
use sqlx::SqlitePool;

use maintenance_manager::database::Database;
use maintenance_manager::services::MaintenanceService;

/// Test database wrapper for in-memory SQLite
pub struct TestDatabase {
    database: Arc<Database>,
}

impl TestDatabase {
    /// Create a new in-memory test database with the real schema
    pub async fn new() -> Result<Self> {
        Ok(Self {
            database: Arc::new(Database::in_memory().await?),
        })
    }

    pub fn database(&self) -> Arc<Database> {
        self.database.clone()
    }

    /// Get the database pool for raw queries
    pub fn pool(&self) -> &SqlitePool {
        self.database.pool()
    }

    /// A maintenance service backed by this database
    pub fn service(&self) -> MaintenanceService {
        MaintenanceService::new(self.database.clone())
    }
}
