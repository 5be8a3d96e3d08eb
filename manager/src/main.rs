use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use maintenance_manager::config::ConfigManager;
use maintenance_manager::database::Database;
use maintenance_manager::scheduler::MaintenanceScheduler;
use maintenance_manager::services::MaintenanceService;
use maintenance_manager::web::start_web_server;

const DEFAULT_CONFIG_PATH: &str = "config/main.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity
    let env_filter = EnvFilter::from_default_env()
        .add_directive("maintenance_manager=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting Maintenance Manager");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config_manager = ConfigManager::new(&config_path).await?;
    let config = config_manager.get_current_config();
    info!(
        "Configuration loaded from {}: listening on {}:{}, tick every {}s",
        config_path, config.host, config.port, config.tick_interval_seconds
    );
    if config.api_token.is_none() {
        warn!("No api_token configured - API authentication is disabled");
    }

    let database = Arc::new(Database::new(&config.database_path).await?);

    let maintenance_service = Arc::new(MaintenanceService::new(database));
    info!("MaintenanceService initialized");

    let scheduler = MaintenanceScheduler::new(
        maintenance_service.clone(),
        config.tick_interval_seconds,
    );
    scheduler.start();

    start_web_server(config, maintenance_service).await?;

    Ok(())
}
