//! Task list web server binary

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tasklist_web::WebConfig;

#[derive(Parser)]
#[command(name = "tasklist-web")]
#[command(about = "Single-page in-memory task list")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "tasklist.toml")]
    config: PathBuf,

    /// Listen host (overrides config and TASKLIST_WEB_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides config and TASKLIST_WEB_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = WebConfig::load(&cli.config)?;
    config.apply_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    info!(
        "Starting task list v{} ({} seed task(s), max {} session(s))",
        tasklist_common::VERSION,
        config.seed.len(),
        config.max_sessions
    );

    tasklist_web::serve(config).await
}
