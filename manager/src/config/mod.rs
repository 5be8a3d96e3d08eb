pub mod manager;

pub use manager::ConfigManager;

use serde::{Deserialize, Serialize};

use crate::constants::scheduler;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_seconds: u64,
    /// Expected bearer token for all API calls. Unset disables the check
    /// for local development.
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8095
}

fn default_database_path() -> String {
    "data/maintenance.db".to_string()
}

fn default_tick_interval() -> u64 {
    scheduler::DEFAULT_TICK_INTERVAL_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            tick_interval_seconds: default_tick_interval(),
            api_token: None,
        }
    }
}
