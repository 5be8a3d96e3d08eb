//! Database record types (entities).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::pagination;

/// Lifecycle state of a maintenance window.
///
/// Windows only move forward: scheduled windows either start (manually or by
/// the ticker) or get cancelled; in-progress windows always end up completed.
/// Completed and cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Cancelled => "cancelled",
        }
    }

    /// Case-insensitive parse, accepting both `in_progress` and `in-progress`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "scheduled" => Some(MaintenanceStatus::Scheduled),
            "in_progress" | "in-progress" => Some(MaintenanceStatus::InProgress),
            "completed" => Some(MaintenanceStatus::Completed),
            "cancelled" => Some(MaintenanceStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal records reject every further mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MaintenanceStatus::Completed | MaintenanceStatus::Cancelled
        )
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive category of a window. Has no behavioral effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    Database,
    System,
    Network,
    Other,
}

impl MaintenanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::Database => "database",
            MaintenanceType::System => "system",
            MaintenanceType::Network => "network",
            MaintenanceType::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "database" => Some(MaintenanceType::Database),
            "system" => Some(MaintenanceType::System),
            "network" => Some(MaintenanceType::Network),
            "other" => Some(MaintenanceType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted maintenance window.
///
/// `is_active` is denormalized from `status == InProgress` so the
/// current-status lookup is a single indexed query. At most one row may have
/// it set at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: MaintenanceStatus,
    #[serde(rename = "type")]
    pub window_type: MaintenanceType,
    pub is_active: bool,
    /// Set when a forced early start pushed the start past the original end
    /// and the end had to be extended by the grace window.
    pub auto_adjusted: bool,
    /// Whole minutes between actual start and actual end, filled in when the
    /// window transitions to completed.
    #[serde(rename = "duration")]
    pub duration_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filter and pagination parameters for window listings.
#[derive(Debug, Clone)]
pub struct WindowFilter {
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    /// Empty means "any status".
    pub statuses: Vec<MaintenanceStatus>,
    pub window_type: Option<MaintenanceType>,
    /// Inclusive range on `start_time`.
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: u32,
    pub limit: u32,
}

impl Default for WindowFilter {
    fn default() -> Self {
        Self {
            title: None,
            statuses: Vec::new(),
            window_type: None,
            from: None,
            to: None,
            page: 1,
            limit: pagination::DEFAULT_PAGE_SIZE,
        }
    }
}
