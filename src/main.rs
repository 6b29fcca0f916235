//! MarkIt server binary.
//!
//! ```text
//! markit [--config markit.toml] [--host 0.0.0.0] [--port 8000] [--log-level debug]
//! ```

use std::path::PathBuf;

use clap::Parser;

use markit::config::{load_config, validate_config, ConfigError, ServiceConfig};
use markit::lifecycle::startup;
use markit::observability::logging;

#[derive(Parser)]
#[command(name = "markit", version)]
#[command(about = "Convert URLs and files to Markdown over HTTP", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind.
    #[arg(short, long)]
    port: Option<u16>,

    /// Log filter directive (overridden by RUST_LOG).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    config
        .listener
        .apply_overrides(cli.host.as_deref(), cli.port);
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        max_upload_bytes = config.limits.max_upload_bytes,
        metrics_enabled = config.observability.metrics_enabled,
        "markit starting"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
