use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{self, Overrides};
use crate::grafana::source::HttpSource;
use crate::grafana::target::HttpTarget;
use crate::grafana::Connection;
use crate::migrate::{MigrationOrchestrator, MigrationReport};

/// Copy folders and dashboards from one Grafana instance to another.
///
/// Credentials are read from SOURCE_TOKEN and TARGET_TOKEN. Every run creates
/// new folders on the target, so running twice duplicates them.
#[derive(Debug, Parser)]
#[command(name = "grafana-migrate", version)]
pub struct Args {
    /// Config file (default: ~/.grafana-migrate/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the instance to copy from
    #[arg(long, env = "SOURCE_URL", value_name = "URL")]
    pub source_url: Option<String>,

    /// Base URL of the instance to copy into
    #[arg(long, env = "TARGET_URL", value_name = "URL")]
    pub target_url: Option<String>,

    /// Version message attached to every imported dashboard
    #[arg(long)]
    pub message: Option<String>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            source_url: self.source_url.clone(),
            target_url: self.target_url.clone(),
            message: self.message.clone(),
        }
    }
}

pub async fn handle_migrate(args: &Args) -> Result<MigrationReport> {
    let config = config::load(args.config.as_deref(), &args.overrides())?;

    let source_conn = Connection::new(
        &config.source.url,
        &config.source.token,
        config.request_timeout,
    )?;
    let target_conn = Connection::new(
        &config.target.url,
        &config.target.token,
        config.request_timeout,
    )?;
    tracing::info!(
        "Migrating from {} to {}",
        source_conn.base_url(),
        target_conn.base_url()
    );

    let source = HttpSource::new(source_conn);
    let target = HttpTarget::new(target_conn, config.message);

    let report = MigrationOrchestrator::new(&source, &target)
        .run()
        .await
        .context("Migration aborted")?;

    if !report.is_complete() {
        tracing::warn!("Some items were not migrated; see the errors above");
    }
    Ok(report)
}
