//! LiveColab server
//!
//! ```sh
//! # Default config (~/.config/livecolab/config.toml)
//! livecolab-server
//!
//! # Custom config path and port
//! livecolab-server --config /etc/livecolab/config.toml --port 8080
//!
//! # Validate config without starting
//! livecolab-server --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use livecolab::config::AppConfig;
use livecolab::server::{init_tracing, ServerHandle, ServerOptions};

/// Profile and document backend for the LiveColab frontend.
#[derive(Parser, Debug)]
#[command(
    name = "livecolab-server",
    version,
    about = "Profile and document backend for the LiveColab frontend",
    long_about = "LiveColab HTTP server: token issuance, profile management and \
                  document uploads.\n\n\
                  Default config: ~/.config/livecolab/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "LIVECOLAB_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(livecolab::default_config_path);
    let loaded = AppConfig::load(&config_path);
    let load_error = loaded.as_ref().err().map(|e| e.to_string());
    let mut config = loaded.unwrap_or_default();

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            warn!("Using default configuration.");
        }
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.address());
        println!("   Database    : {}", config.database.url);
        println!("   Documents   : {}", config.storage.documents_dir.display());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    if !handle.wait().await {
        warn!("Shutdown did not finish cleanly");
    }

    Ok(())
}
