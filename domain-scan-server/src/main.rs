//! HTTP server exposing the translate, domain-status and website-traffic
//! endpoints.
//!
//! Configuration comes from the same TOML files and `DS_*` variables as the
//! CLI; `[server]` / `DS_HOST` / `DS_PORT` choose the listen address.

mod api;

use domain_scan_lib::{load_env_config, ConfigManager, FileConfig, ScanConfig, ServerSettings};
use std::process;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("domain_scan_server=info,domain_scan_lib=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let env_config = load_env_config(true);
    let manager = ConfigManager::new(true);

    let file_config = match &env_config.config {
        Some(path) => manager
            .load_file(path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?,
        None => manager
            .discover_and_load()
            .unwrap_or_else(|_| FileConfig::default()),
    };

    let config = env_config.apply_to(file_config.apply_to(ScanConfig::default())?);
    let settings = ServerSettings::resolve(&file_config, &env_config);

    info!(
        "domain-scan-server v{} (bootstrap: {})",
        env!("CARGO_PKG_VERSION"),
        config.bootstrap_url
    );

    let state = api::ApiState::from_config(&config)?;
    api::serve(&settings.address(), state).await?;

    info!("server stopped");
    Ok(())
}
