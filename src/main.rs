mod cli;
mod config;
mod error;
mod grafana;
mod migrate;
mod model;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .init();

    let args = cli::Args::parse();
    if let Err(err) = cli::handle_migrate(&args).await {
        if let Some(e) = err.downcast_ref::<error::MigrateError>() {
            if e.is_configuration() {
                tracing::error!("Configuration error: {e}");
            }
        }
        return Err(err);
    }

    Ok(())
}
