mod config;
mod constants;
mod core_cli;
mod core_ftpcommand;
mod core_log;
mod core_network;
mod core_vfs;
mod server;
mod session;

use crate::config::{log_config, Config};
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::core_cli::Cli;
use crate::core_log::logger::init_logger;
use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logger(args.verbose);

    let config_path = if args.config.is_empty() {
        DEFAULT_CONFIG_PATH
    } else {
        args.config.as_str()
    };

    // An explicit --config must exist; the default one is optional.
    let mut config = if args.config.is_empty() && !Path::new(config_path).exists() {
        warn!("{} not found, using built-in defaults", config_path);
        Config::default()
    } else {
        Config::load_from_file(config_path)?
    };

    if let Some(password) = args.password {
        config.server.password = Some(password);
    }
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }

    info!("Starting {} with configuration {}", constants::SERVER_NAME, config_path);
    log_config(&config);
    if config.partitions.is_empty() {
        warn!("No partitions configured, the root directory will be empty");
    }

    server::run(config).await
}
