//! Command layer and state machine for maintenance windows.
//!
//! Every transition a window can make lives here, so the HTTP handlers and
//! the scheduler tick share one implementation of the lifecycle rules:
//!
//! ```text
//! scheduled -> in_progress -> completed
//! scheduled -> cancelled
//! ```
//!
//! Two invariants are enforced on every mutation: at most one window is
//! active at a time, and open windows (scheduled or in progress) never have
//! overlapping intervals.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::{maintenance, pagination};
use crate::database::{
    Database, MaintenanceStatus, MaintenanceType, MaintenanceWindow, WindowFilter,
};
use crate::errors::MaintenanceError;

/// Statuses a new or revised interval is checked against for overlap.
const OPEN_STATUSES: [MaintenanceStatus; 2] =
    [MaintenanceStatus::Scheduled, MaintenanceStatus::InProgress];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWindowRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub window_type: MaintenanceType,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWindowRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub window_type: Option<MaintenanceType>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStatus {
    pub is_under_maintenance: bool,
    pub maintenance: Option<MaintenanceWindow>,
}

/// One page of a filtered listing.
#[derive(Debug, Clone, Serialize)]
pub struct WindowPage {
    pub items: Vec<MaintenanceWindow>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// What a single scheduler tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub promoted: usize,
    pub completed: usize,
}

#[derive(Clone)]
pub struct MaintenanceService {
    database: Arc<Database>,
}

impl MaintenanceService {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    pub async fn create(
        &self,
        request: CreateWindowRequest,
    ) -> Result<MaintenanceWindow, MaintenanceError> {
        self.create_at(request, Utc::now()).await
    }

    /// Creates a window. A start time at or before `now` creates the window
    /// directly in progress (stopping whatever was active); a future start
    /// creates it scheduled.
    pub async fn create_at(
        &self,
        request: CreateWindowRequest,
        now: DateTime<Utc>,
    ) -> Result<MaintenanceWindow, MaintenanceError> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(MaintenanceError::Validation("title is required".to_string()));
        }
        if request.end_time <= request.start_time {
            return Err(MaintenanceError::Validation(
                "endTime must be after startTime".to_string(),
            ));
        }
        if request.end_time <= now {
            return Err(MaintenanceError::Validation(
                "window lies entirely in the past".to_string(),
            ));
        }

        let immediate = request.start_time <= now;

        // An immediate window is about to replace the active one, so the
        // active window is not a conflict for it; only other scheduled
        // windows are.
        let overlap_statuses: &[MaintenanceStatus] = if immediate {
            &[MaintenanceStatus::Scheduled]
        } else {
            &OPEN_STATUSES
        };
        self.check_overlap(request.start_time, request.end_time, None, overlap_statuses)
            .await?;

        if immediate {
            self.stop_active_window(now).await?;
        }

        let window = MaintenanceWindow {
            id: Uuid::new_v4().to_string(),
            title,
            description: request.description,
            start_time: request.start_time,
            end_time: request.end_time,
            status: if immediate {
                MaintenanceStatus::InProgress
            } else {
                MaintenanceStatus::Scheduled
            },
            window_type: request.window_type,
            is_active: immediate,
            auto_adjusted: false,
            duration_minutes: None,
            created_at: now,
            updated_at: now,
        };
        self.database.insert_window(&window).await?;

        info!(
            "Maintenance window created: '{}' [{}] {} - {} ({})",
            window.title, window.id, window.start_time, window.end_time, window.status
        );
        Ok(window)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateWindowRequest,
    ) -> Result<MaintenanceWindow, MaintenanceError> {
        self.update_at(id, request, Utc::now()).await
    }

    /// Partial update. Only scheduled windows may be edited.
    pub async fn update_at(
        &self,
        id: &str,
        request: UpdateWindowRequest,
        now: DateTime<Utc>,
    ) -> Result<MaintenanceWindow, MaintenanceError> {
        let mut window = self.get(id).await?;
        if window.status != MaintenanceStatus::Scheduled {
            return Err(MaintenanceError::Validation(format!(
                "only scheduled windows can be edited, '{}' is {}",
                window.title, window.status
            )));
        }

        if let Some(title) = request.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(MaintenanceError::Validation("title is required".to_string()));
            }
            window.title = title;
        }
        if let Some(description) = request.description {
            window.description = Some(description);
        }
        if let Some(window_type) = request.window_type {
            window.window_type = window_type;
        }
        if let Some(start_time) = request.start_time {
            if start_time < now {
                return Err(MaintenanceError::Validation(
                    "startTime must not be in the past".to_string(),
                ));
            }
            window.start_time = start_time;
        }
        if let Some(end_time) = request.end_time {
            window.end_time = end_time;
        }
        if window.end_time <= window.start_time {
            return Err(MaintenanceError::Validation(
                "endTime must be after startTime".to_string(),
            ));
        }

        self.check_overlap(window.start_time, window.end_time, Some(id), &OPEN_STATUSES)
            .await?;

        window.updated_at = now;
        self.database.update_window(&window).await?;
        Ok(window)
    }

    pub async fn start_now(&self, id: &str) -> Result<MaintenanceWindow, MaintenanceError> {
        self.start_now_at(id, Utc::now()).await
    }

    /// Forces a scheduled window to start immediately. If its end has
    /// already passed, the end is pushed out by the grace window so the
    /// forced start leaves usable duration.
    pub async fn start_now_at(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<MaintenanceWindow, MaintenanceError> {
        let mut window = self.get(id).await?;
        if window.status != MaintenanceStatus::Scheduled {
            return Err(MaintenanceError::Validation(format!(
                "only scheduled windows can be started, '{}' is {}",
                window.title, window.status
            )));
        }

        self.stop_active_window(now).await?;

        window.start_time = now;
        if now > window.end_time {
            window.end_time = now + Duration::minutes(maintenance::START_NOW_GRACE_MINUTES);
            window.auto_adjusted = true;
        }
        window.status = MaintenanceStatus::InProgress;
        window.is_active = true;
        window.updated_at = now;
        self.database.update_window(&window).await?;

        info!(
            "Maintenance window started manually: '{}' [{}] until {}{}",
            window.title,
            window.id,
            window.end_time,
            if window.auto_adjusted {
                " (end auto-adjusted)"
            } else {
                ""
            }
        );
        Ok(window)
    }

    pub async fn stop(&self, id: &str) -> Result<MaintenanceWindow, MaintenanceError> {
        self.stop_at(id, Utc::now()).await
    }

    /// Ends an in-progress window now, recording its actual duration.
    pub async fn stop_at(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<MaintenanceWindow, MaintenanceError> {
        let mut window = self.get(id).await?;
        if window.status != MaintenanceStatus::InProgress {
            return Err(MaintenanceError::Validation(format!(
                "only in-progress windows can be stopped, '{}' is {}",
                window.title, window.status
            )));
        }

        Self::apply_stop(&mut window, now);
        self.database.update_window(&window).await?;

        info!(
            "Maintenance window stopped: '{}' [{}] after {}m",
            window.title,
            window.id,
            window.duration_minutes.unwrap_or(0)
        );
        Ok(window)
    }

    pub async fn cancel(&self, id: &str) -> Result<MaintenanceWindow, MaintenanceError> {
        self.cancel_at(id, Utc::now()).await
    }

    pub async fn cancel_at(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<MaintenanceWindow, MaintenanceError> {
        let mut window = self.get(id).await?;
        if window.status != MaintenanceStatus::Scheduled {
            return Err(MaintenanceError::Validation(format!(
                "only scheduled windows can be cancelled, '{}' is {}",
                window.title, window.status
            )));
        }

        window.status = MaintenanceStatus::Cancelled;
        window.is_active = false;
        window.updated_at = now;
        self.database.update_window(&window).await?;

        info!("Maintenance window cancelled: '{}' [{}]", window.title, window.id);
        Ok(window)
    }

    /// Deletes the named windows, all or nothing. An in-progress window can
    /// never be deleted; stop it first.
    pub async fn remove(&self, ids: &[String]) -> Result<u64, MaintenanceError> {
        if ids.is_empty() {
            return Err(MaintenanceError::Validation(
                "at least one id is required".to_string(),
            ));
        }

        for id in ids {
            let window = self.get(id).await?;
            if window.status == MaintenanceStatus::InProgress {
                return Err(MaintenanceError::Validation(format!(
                    "window '{}' is in progress and cannot be deleted",
                    window.title
                )));
            }
        }

        let deleted = self.database.delete_windows(ids).await?;
        info!("Deleted {} maintenance window(s)", deleted);
        Ok(deleted)
    }

    pub async fn get(&self, id: &str) -> Result<MaintenanceWindow, MaintenanceError> {
        self.database
            .get_window_by_id(id)
            .await?
            .ok_or_else(|| MaintenanceError::NotFound(format!("maintenance window '{}'", id)))
    }

    pub async fn current_status(&self) -> Result<CurrentStatus, MaintenanceError> {
        let active = self.database.find_active_window().await?;
        Ok(CurrentStatus {
            is_under_maintenance: active.is_some(),
            maintenance: active,
        })
    }

    pub async fn find_all(&self, filter: WindowFilter) -> Result<WindowPage, MaintenanceError> {
        let mut filter = filter;
        filter.page = filter.page.max(1);
        filter.limit = filter.limit.clamp(1, pagination::MAX_PAGE_SIZE);

        let (items, total) = self.database.list_windows(&filter).await?;
        Ok(WindowPage {
            items,
            total,
            page: filter.page,
            limit: filter.limit,
        })
    }

    pub async fn find_upcoming(&self) -> Result<Vec<MaintenanceWindow>, MaintenanceError> {
        self.find_upcoming_at(Utc::now()).await
    }

    pub async fn find_upcoming_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<MaintenanceWindow>, MaintenanceError> {
        let windows = self
            .database
            .find_upcoming_windows(now, maintenance::UPCOMING_HORIZON_HOURS)
            .await?;
        Ok(windows)
    }

    /// One scheduler pass: promote due windows, then complete expired ones.
    ///
    /// Promotion runs first so a window expiring in the same tick a new one
    /// becomes due is closed out as part of the handoff. Each record is
    /// processed independently: a failed write is logged and retried on the
    /// next tick because the row keeps its pre-transition state.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> Result<TickSummary, MaintenanceError> {
        let mut summary = TickSummary::default();

        let due = self.database.find_due_windows(now).await?;
        if !due.is_empty() {
            match self.stop_active_window(now).await {
                Ok(_) => {
                    for mut window in due {
                        window.status = MaintenanceStatus::InProgress;
                        window.is_active = true;
                        window.updated_at = now;
                        match self.database.update_window(&window).await {
                            Ok(()) => {
                                summary.promoted += 1;
                                info!(
                                    "Maintenance window started: '{}' [{}] until {}",
                                    window.title, window.id, window.end_time
                                );
                            }
                            Err(e) => {
                                warn!(
                                    "Failed to start maintenance window {}: {}",
                                    window.id, e
                                );
                            }
                        }
                    }
                }
                // Promoting without the stop would leave two active windows,
                // so skip promotion entirely and retry next tick.
                Err(e) => {
                    warn!("Could not stop active window, skipping promotion: {}", e);
                }
            }
        }

        let expired = self.database.find_expired_windows(now).await?;
        for mut window in expired {
            window.status = MaintenanceStatus::Completed;
            window.is_active = false;
            window.duration_minutes = Some((now - window.start_time).num_minutes());
            window.updated_at = now;
            match self.database.update_window(&window).await {
                Ok(()) => {
                    summary.completed += 1;
                    info!(
                        "Maintenance window completed: '{}' [{}] after {}m",
                        window.title,
                        window.id,
                        window.duration_minutes.unwrap_or(0)
                    );
                }
                Err(e) => {
                    warn!("Failed to complete maintenance window {}: {}", window.id, e);
                }
            }
        }

        Ok(summary)
    }

    async fn check_overlap(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude_id: Option<&str>,
        statuses: &[MaintenanceStatus],
    ) -> Result<(), MaintenanceError> {
        let overlapping = self
            .database
            .find_overlapping_windows(start_time, end_time, exclude_id, statuses)
            .await?;
        if let Some(existing) = overlapping.first() {
            return Err(MaintenanceError::Conflict(format!(
                "interval overlaps window '{}' ({} - {})",
                existing.title, existing.start_time, existing.end_time
            )));
        }
        Ok(())
    }

    /// Applies the manual-stop transition to whichever window is active, if
    /// any. Invoked before anything else is forced into progress.
    async fn stop_active_window(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<MaintenanceWindow>, MaintenanceError> {
        let Some(mut active) = self.database.find_active_window().await? else {
            return Ok(None);
        };

        Self::apply_stop(&mut active, now);
        self.database.update_window(&active).await?;

        info!(
            "Active maintenance window stopped for handoff: '{}' [{}] after {}m",
            active.title,
            active.id,
            active.duration_minutes.unwrap_or(0)
        );
        Ok(Some(active))
    }

    /// in_progress -> completed with the end pinned to `now`. Duration is
    /// whole minutes between actual start and actual end, floored.
    fn apply_stop(window: &mut MaintenanceWindow, now: DateTime<Utc>) {
        window.end_time = now;
        window.status = MaintenanceStatus::Completed;
        window.is_active = false;
        window.duration_minutes = Some((now - window.start_time).num_minutes());
        window.updated_at = now;
    }
}
