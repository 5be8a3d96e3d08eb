use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::MaintenanceService;
use crate::web::{handlers, AppState};

pub async fn start_web_server(
    config: Arc<Config>,
    maintenance_service: Arc<MaintenanceService>,
) -> Result<()> {
    let state = AppState::new(config.clone(), maintenance_service);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // === MAINTENANCE WINDOW ROUTES ===
        .route(
            "/api/maintenance",
            post(handlers::create_maintenance_window)
                .get(handlers::list_maintenance_windows)
                .delete(handlers::bulk_delete_maintenance_windows),
        )
        .route(
            "/api/maintenance/current-status",
            get(handlers::get_current_status),
        )
        .route(
            "/api/maintenance/upcoming",
            get(handlers::get_upcoming_windows),
        )
        .route(
            "/api/maintenance/{id}",
            get(handlers::get_maintenance_window)
                .patch(handlers::update_maintenance_window)
                .delete(handlers::delete_maintenance_window),
        )
        .route(
            "/api/maintenance/{id}/start",
            post(handlers::start_maintenance_window),
        )
        .route(
            "/api/maintenance/{id}/stop",
            post(handlers::stop_maintenance_window),
        )
        .route(
            "/api/maintenance/{id}/cancel",
            post(handlers::cancel_maintenance_window),
        )
        // Add middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
