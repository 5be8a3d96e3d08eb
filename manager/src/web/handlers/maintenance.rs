// Maintenance window endpoints

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::common::{domain_error, ApiResponse, ApiResult, WindowListQuery};
use crate::database::MaintenanceWindow;
use crate::services::{CreateWindowRequest, CurrentStatus, UpdateWindowRequest, WindowPage};
use crate::web::middleware::BearerAuth;
use crate::web::AppState;

pub async fn create_maintenance_window(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateWindowRequest>,
) -> ApiResult<MaintenanceWindow> {
    let window = state
        .maintenance_service
        .create(request)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(window)))
}

pub async fn list_maintenance_windows(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Query(query): Query<WindowListQuery>,
) -> ApiResult<WindowPage> {
    let filter = query.into_filter().map_err(domain_error)?;
    let page = state
        .maintenance_service
        .find_all(filter)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_current_status(
    _auth: BearerAuth,
    State(state): State<AppState>,
) -> ApiResult<CurrentStatus> {
    let status = state
        .maintenance_service
        .current_status()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(status)))
}

pub async fn get_upcoming_windows(
    _auth: BearerAuth,
    State(state): State<AppState>,
) -> ApiResult<Vec<MaintenanceWindow>> {
    let windows = state
        .maintenance_service
        .find_upcoming()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(windows)))
}

pub async fn get_maintenance_window(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MaintenanceWindow> {
    let window = state
        .maintenance_service
        .get(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(window)))
}

pub async fn update_maintenance_window(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateWindowRequest>,
) -> ApiResult<MaintenanceWindow> {
    let window = state
        .maintenance_service
        .update(&id, request)
        .await
        .map_err(domain_error)?;
    info!("Maintenance window updated: {}", id);
    Ok(Json(ApiResponse::success(window)))
}

pub async fn delete_maintenance_window(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let deleted = state
        .maintenance_service
        .remove(std::slice::from_ref(&id))
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(json!({ "deleted": deleted }))))
}

#[derive(Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

pub async fn bulk_delete_maintenance_windows(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> ApiResult<Value> {
    let deleted = state
        .maintenance_service
        .remove(&request.ids)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(json!({ "deleted": deleted }))))
}

pub async fn start_maintenance_window(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MaintenanceWindow> {
    let window = state
        .maintenance_service
        .start_now(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(window)))
}

pub async fn stop_maintenance_window(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MaintenanceWindow> {
    let window = state
        .maintenance_service
        .stop(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(window)))
}

pub async fn cancel_maintenance_window(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MaintenanceWindow> {
    let window = state
        .maintenance_service
        .cancel(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(window)))
}
