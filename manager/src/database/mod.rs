//! Database layer for the maintenance manager.
//!
//! SQLite persistence for maintenance windows. The module is organized into
//! submodules:
//! - `records` - Record types (entities) and listing filters
//! - `maintenance` - Maintenance window queries

mod maintenance;
mod records;

pub use records::*;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use tracing::{error, info};

pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Expose pool for integration test queries
    #[allow(dead_code)]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn new(database_path: &str) -> Result<Self> {
        info!("Database path: {}", database_path);

        if let Some(parent) = Path::new(database_path).parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!("Failed to create parent directory {:?}: {}", parent, e);
                return Err(e.into());
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = match SqlitePool::connect(&database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                error!("Failed to connect to database {}: {}", database_url, e);
                return Err(e.into());
            }
        };

        let database = Self { pool };
        database.initialize_tables().await?;
        info!("Database initialized");

        Ok(database)
    }

    /// In-memory database for tests. A single connection is required so every
    /// query sees the same memory-backed store.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let database = Self { pool };
        database.initialize_tables().await?;
        Ok(database)
    }

    async fn initialize_tables(&self) -> Result<()> {
        let windows_table_sql = r#"
            CREATE TABLE IF NOT EXISTS maintenance_windows (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                start_time DATETIME NOT NULL,
                end_time DATETIME NOT NULL,
                status TEXT NOT NULL,
                window_type TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 0,
                auto_adjusted BOOLEAN NOT NULL DEFAULT 0,
                duration_minutes INTEGER,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
        "#;

        if let Err(e) = sqlx::query(windows_table_sql).execute(&self.pool).await {
            error!("Failed to create maintenance_windows table: {}", e);
            return Err(e.into());
        }

        // The tick queries select on status and time, the current-status
        // lookup on is_active.
        let status_index_sql = "CREATE INDEX IF NOT EXISTS idx_windows_status_start \
             ON maintenance_windows(status, start_time DESC)";
        if let Err(e) = sqlx::query(status_index_sql).execute(&self.pool).await {
            error!("Failed to create maintenance_windows status index: {}", e);
            return Err(e.into());
        }

        let active_index_sql =
            "CREATE INDEX IF NOT EXISTS idx_windows_active ON maintenance_windows(is_active)";
        if let Err(e) = sqlx::query(active_index_sql).execute(&self.pool).await {
            error!("Failed to create maintenance_windows active index: {}", e);
            return Err(e.into());
        }

        Ok(())
    }
}
