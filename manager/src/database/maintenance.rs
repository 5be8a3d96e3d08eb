//! Maintenance window database operations.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite};
use tracing::debug;

use super::records::{MaintenanceStatus, MaintenanceType, MaintenanceWindow, WindowFilter};
use super::Database;

const WINDOW_COLUMNS: &str = "id, title, description, start_time, end_time, status, window_type, \
     is_active, auto_adjusted, duration_minutes, created_at, updated_at";

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

fn window_from_row(row: &SqliteRow) -> Result<MaintenanceWindow> {
    let status_raw: String = row.try_get("status")?;
    let status = MaintenanceStatus::parse(&status_raw)
        .ok_or_else(|| anyhow!("Unknown maintenance status in store: {}", status_raw))?;

    let type_raw: String = row.try_get("window_type")?;
    let window_type = MaintenanceType::parse(&type_raw)
        .ok_or_else(|| anyhow!("Unknown maintenance type in store: {}", type_raw))?;

    Ok(MaintenanceWindow {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        status,
        window_type,
        is_active: row.try_get("is_active")?,
        auto_adjusted: row.try_get("auto_adjusted")?,
        duration_minutes: row.try_get("duration_minutes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Appends the filter's WHERE conditions. Must stay in sync with
/// `bind_filter` below: both walk the filter fields in the same order.
fn filter_conditions(filter: &WindowFilter) -> Vec<String> {
    let mut conditions = Vec::new();
    if filter.title.is_some() {
        conditions.push("title LIKE ?".to_string());
    }
    if !filter.statuses.is_empty() {
        conditions.push(format!("status IN ({})", placeholders(filter.statuses.len())));
    }
    if filter.window_type.is_some() {
        conditions.push("window_type = ?".to_string());
    }
    if filter.from.is_some() {
        conditions.push("start_time >= ?".to_string());
    }
    if filter.to.is_some() {
        conditions.push("start_time <= ?".to_string());
    }
    conditions
}

fn bind_filter<'q>(mut query: SqliteQuery<'q>, filter: &WindowFilter) -> SqliteQuery<'q> {
    if let Some(title) = &filter.title {
        // SQLite LIKE is case-insensitive for ASCII.
        query = query.bind(format!("%{}%", title));
    }
    for status in &filter.statuses {
        query = query.bind(status.as_str());
    }
    if let Some(window_type) = filter.window_type {
        query = query.bind(window_type.as_str());
    }
    if let Some(from) = filter.from {
        query = query.bind(from);
    }
    if let Some(to) = filter.to {
        query = query.bind(to);
    }
    query
}

impl Database {
    pub async fn insert_window(&self, window: &MaintenanceWindow) -> Result<()> {
        debug!("Storing maintenance window: {}", window.id);

        sqlx::query(
            r#"
            INSERT INTO maintenance_windows (
                id, title, description, start_time, end_time, status, window_type,
                is_active, auto_adjusted, duration_minutes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&window.id)
        .bind(&window.title)
        .bind(&window.description)
        .bind(window.start_time)
        .bind(window.end_time)
        .bind(window.status.as_str())
        .bind(window.window_type.as_str())
        .bind(window.is_active)
        .bind(window.auto_adjusted)
        .bind(window.duration_minutes)
        .bind(window.created_at)
        .bind(window.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_window(&self, window: &MaintenanceWindow) -> Result<()> {
        debug!("Updating maintenance window: {}", window.id);

        let result = sqlx::query(
            r#"
            UPDATE maintenance_windows
            SET title = ?, description = ?, start_time = ?, end_time = ?,
                status = ?, window_type = ?, is_active = ?, auto_adjusted = ?,
                duration_minutes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&window.title)
        .bind(&window.description)
        .bind(window.start_time)
        .bind(window.end_time)
        .bind(window.status.as_str())
        .bind(window.window_type.as_str())
        .bind(window.is_active)
        .bind(window.auto_adjusted)
        .bind(window.duration_minutes)
        .bind(window.updated_at)
        .bind(&window.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Maintenance window {} no longer exists", window.id));
        }
        Ok(())
    }

    pub async fn get_window_by_id(&self, id: &str) -> Result<Option<MaintenanceWindow>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM maintenance_windows WHERE id = ?",
            WINDOW_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(window_from_row).transpose()
    }

    pub async fn delete_windows(&self, ids: &[String]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "DELETE FROM maintenance_windows WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.as_str());
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// The single active window, if any. The command layer keeps at most one
    /// row with `is_active` set.
    pub async fn find_active_window(&self) -> Result<Option<MaintenanceWindow>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM maintenance_windows WHERE is_active = 1 LIMIT 1",
            WINDOW_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(window_from_row).transpose()
    }

    /// Scheduled windows whose interval contains `now`, oldest start first.
    pub async fn find_due_windows(&self, now: DateTime<Utc>) -> Result<Vec<MaintenanceWindow>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM maintenance_windows \
             WHERE status = 'scheduled' AND start_time <= ? AND end_time > ? \
             ORDER BY start_time ASC",
            WINDOW_COLUMNS
        ))
        .bind(now)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(window_from_row).collect()
    }

    /// In-progress windows whose end has passed.
    pub async fn find_expired_windows(&self, now: DateTime<Utc>) -> Result<Vec<MaintenanceWindow>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM maintenance_windows \
             WHERE status = 'in_progress' AND end_time <= ? \
             ORDER BY end_time ASC",
            WINDOW_COLUMNS
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(window_from_row).collect()
    }

    /// Windows in one of `statuses` whose interval overlaps
    /// `[start_time, end_time]`. Uses the closed-interval test, so two
    /// windows that merely touch at an endpoint count as overlapping.
    pub async fn find_overlapping_windows(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude_id: Option<&str>,
        statuses: &[MaintenanceStatus],
    ) -> Result<Vec<MaintenanceWindow>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = format!(
            "SELECT {} FROM maintenance_windows \
             WHERE status IN ({}) AND start_time <= ? AND end_time >= ?",
            WINDOW_COLUMNS,
            placeholders(statuses.len())
        );
        if exclude_id.is_some() {
            sql.push_str(" AND id != ?");
        }

        let mut query = sqlx::query(&sql);
        for status in statuses {
            query = query.bind(status.as_str());
        }
        query = query.bind(end_time).bind(start_time);
        if let Some(id) = exclude_id {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(window_from_row).collect()
    }

    /// Scheduled windows starting within the next `horizon_hours`.
    pub async fn find_upcoming_windows(
        &self,
        now: DateTime<Utc>,
        horizon_hours: i64,
    ) -> Result<Vec<MaintenanceWindow>> {
        let horizon = now + Duration::hours(horizon_hours);

        let rows = sqlx::query(&format!(
            "SELECT {} FROM maintenance_windows \
             WHERE status = 'scheduled' AND start_time > ? AND start_time <= ? \
             ORDER BY start_time ASC",
            WINDOW_COLUMNS
        ))
        .bind(now)
        .bind(horizon)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(window_from_row).collect()
    }

    /// Filtered, paginated listing sorted by start time descending. Returns
    /// the page of windows plus the total row count for the filter.
    pub async fn list_windows(
        &self,
        filter: &WindowFilter,
    ) -> Result<(Vec<MaintenanceWindow>, i64)> {
        let conditions = filter_conditions(filter);
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!(
            "SELECT COUNT(*) AS total FROM maintenance_windows{}",
            where_clause
        );
        let count_row = bind_filter(sqlx::query(&count_sql), filter)
            .fetch_one(&self.pool)
            .await?;
        let total: i64 = count_row.try_get("total")?;

        let offset = i64::from(filter.page.saturating_sub(1)) * i64::from(filter.limit);
        let select_sql = format!(
            "SELECT {} FROM maintenance_windows{} ORDER BY start_time DESC LIMIT ? OFFSET ?",
            WINDOW_COLUMNS, where_clause
        );
        let rows = bind_filter(sqlx::query(&select_sql), filter)
            .bind(i64::from(filter.limit))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let windows = rows
            .iter()
            .map(window_from_row)
            .collect::<Result<Vec<_>>>()?;
        Ok((windows, total))
    }
}
