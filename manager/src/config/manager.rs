use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::fs;
use tracing::debug;

use super::Config;

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_path: &str) -> Result<Self> {
        let config = Self::load_configuration(config_path).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_path: &str) -> Result<Config> {
        let content = fs::read_to_string(config_path)
            .await
            .map_err(|e| anyhow!("Failed to read config {}: {}", config_path, e))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| anyhow!("Failed to parse config: {}", e))?;

        debug!("Configuration loaded from {}", config_path);
        Ok(config)
    }
}
