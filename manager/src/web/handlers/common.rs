// Common types and utilities for API handlers

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::database::{MaintenanceStatus, MaintenanceType, WindowFilter};
use crate::errors::MaintenanceError;

// Helper type for API responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Maps a domain error onto the HTTP surface.
pub fn domain_error(error: MaintenanceError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status = match &error {
        MaintenanceError::Validation(_) => StatusCode::BAD_REQUEST,
        MaintenanceError::Conflict(_) => StatusCode::CONFLICT,
        MaintenanceError::NotFound(_) => StatusCode::NOT_FOUND,
        MaintenanceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Request failed: {}", error);
    }

    (status, Json(ApiResponse::error(error.to_string())))
}

// Query parameters
#[derive(Deserialize)]
pub struct WindowListQuery {
    pub title: Option<String>,
    /// Single status or a comma-separated set.
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub window_type: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl WindowListQuery {
    pub fn into_filter(self) -> Result<WindowFilter, MaintenanceError> {
        let mut filter = WindowFilter {
            title: self.title,
            from: self.from,
            to: self.to,
            ..WindowFilter::default()
        };

        if let Some(raw) = self.status {
            for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let status = MaintenanceStatus::parse(part).ok_or_else(|| {
                    MaintenanceError::Validation(format!("unknown status '{}'", part))
                })?;
                filter.statuses.push(status);
            }
        }
        if let Some(raw) = self.window_type {
            filter.window_type = Some(MaintenanceType::parse(&raw).ok_or_else(|| {
                MaintenanceError::Validation(format!("unknown maintenance type '{}'", raw))
            })?);
        }
        if let Some(page) = self.page {
            filter.page = page;
        }
        if let Some(limit) = self.limit {
            filter.limit = limit;
        }

        Ok(filter)
    }
}
