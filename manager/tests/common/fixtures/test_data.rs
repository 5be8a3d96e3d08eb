//! Common test data and builders

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use maintenance_manager::database::{MaintenanceStatus, MaintenanceType, MaintenanceWindow};
use maintenance_manager::services::CreateWindowRequest;

/// Fixed reference instant so duration and boundary assertions are exact
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

pub fn minutes(n: i64) -> Duration {
    Duration::minutes(n)
}

pub fn hours(n: i64) -> Duration {
    Duration::hours(n)
}

/// Common window titles
pub mod titles {
    pub const DB_UPGRADE: &str = "Database upgrade";
    pub const CERT_ROTATION: &str = "Certificate rotation";
    pub const NETWORK_SWAP: &str = "Network switch swap";
}

pub fn window_request(
    title: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> CreateWindowRequest {
    CreateWindowRequest {
        title: title.to_string(),
        description: None,
        start_time,
        end_time,
        window_type: MaintenanceType::System,
    }
}

/// A fully populated record for direct database-layer tests
pub fn make_window(
    title: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: MaintenanceStatus,
) -> MaintenanceWindow {
    let created = start_time - Duration::hours(1);
    MaintenanceWindow {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: None,
        start_time,
        end_time,
        status,
        window_type: MaintenanceType::System,
        is_active: status == MaintenanceStatus::InProgress,
        auto_adjusted: false,
        duration_minutes: None,
        created_at: created,
        updated_at: created,
    }
}
