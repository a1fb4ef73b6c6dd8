use crate::constants::{
    DEFAULT_DATA_SOURCE_PORT, DEFAULT_DATA_TIMEOUT_SECS, DEFAULT_LISTEN_PORT, DEFAULT_MAX_CLIENTS,
    DEFAULT_PASV_PORT_START, SERVER_NAME,
};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_port: u16,
    pub listen_address: String,
    /// Address announced in PASV replies. Empty means the local address of the
    /// control connection.
    pub pasv_address: String,
    pub pasv_port_start: u16,
    /// Source port for active-mode data connections, 0 lets the OS choose.
    pub data_source_port: u16,
    pub data_timeout_secs: u64,
    pub max_clients: usize,
    pub password: Option<String>,
    pub banner: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_LISTEN_PORT,
            listen_address: String::from("0.0.0.0"),
            pasv_address: String::new(),
            pasv_port_start: DEFAULT_PASV_PORT_START,
            data_source_port: DEFAULT_DATA_SOURCE_PORT,
            data_timeout_secs: DEFAULT_DATA_TIMEOUT_SECS,
            max_clients: DEFAULT_MAX_CLIENTS,
            password: None,
            banner: String::from(SERVER_NAME),
        }
    }
}

impl ServerConfig {
    pub fn data_timeout(&self) -> Duration {
        Duration::from_secs(self.data_timeout_secs)
    }
}

/// A host directory exposed under a virtual alias.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PartitionConfig {
    pub name: String,
    /// Single path segment such as `/carda`.
    pub alias: String,
    /// Real mount prefix, the remainder of a virtual path is appended to it.
    pub prefix: String,
    #[serde(default)]
    pub removable: bool,
    #[serde(default = "default_automount")]
    pub automount: bool,
}

fn default_automount() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(rename = "partition")]
    pub partitions: Vec<PartitionConfig>,
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  Listen Address: {}:{}", config.server.listen_address, config.server.listen_port);
    if config.server.pasv_address.is_empty() {
        info!("  PASV Address: <control connection address>");
    } else {
        info!("  PASV Address: {}", config.server.pasv_address);
    }
    info!("  PASV Port Start: {}", config.server.pasv_port_start);
    info!("  Data Source Port: {}", config.server.data_source_port);
    info!("  Data Timeout: {}s", config.server.data_timeout_secs);
    info!("  Max Clients: {}", config.server.max_clients);
    info!(
        "  Password: {}",
        if config.server.password.as_deref().unwrap_or("").is_empty() { "disabled" } else { "set" }
    );
    for partition in &config.partitions {
        info!(
            "  Partition {} at {} -> {}{}",
            partition.name,
            partition.alias,
            partition.prefix,
            if partition.removable { " (removable)" } else { "" }
        );
    }
}
