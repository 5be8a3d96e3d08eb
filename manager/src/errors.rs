//! Custom error types for the maintenance manager
//!
//! Provides structured error handling with context for different failure scenarios.

use std::fmt;

/// Main error type for maintenance window operations
#[derive(Debug)]
pub enum MaintenanceError {
    /// Malformed or logically invalid input (bad time range, wrong status
    /// for the requested transition, editing a terminal record)
    Validation(String),

    /// The proposed interval overlaps an existing open window
    Conflict(String),

    /// Operation references an id that does not exist
    NotFound(String),

    /// Storage-level failure
    Database(String),
}

impl fmt::Display for MaintenanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceError::Validation(msg) => write!(f, "Validation error: {}", msg),
            MaintenanceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            MaintenanceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            MaintenanceError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for MaintenanceError {}

// The storage layer reports through anyhow; everything coming out of it is a
// database failure from the caller's point of view.
impl From<anyhow::Error> for MaintenanceError {
    fn from(err: anyhow::Error) -> Self {
        MaintenanceError::Database(err.to_string())
    }
}

impl From<sqlx::Error> for MaintenanceError {
    fn from(err: sqlx::Error) -> Self {
        MaintenanceError::Database(err.to_string())
    }
}
