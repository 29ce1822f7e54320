use std::fmt;

use crate::error::{MigrateError, Result};
use crate::grafana::{SourceReader, TargetWriter};
use crate::model::dashboard::DashboardSummary;
use crate::model::folder::FolderId;

use super::mapping::{FolderMapper, FolderMapping};
use super::partition::partition;

#[derive(Debug)]
pub enum FolderOutcome {
    Created {
        source_uid: String,
        title: String,
        target_id: FolderId,
    },
    Failed {
        source_uid: String,
        title: String,
        error: MigrateError,
    },
}

#[derive(Debug)]
pub enum DashboardOutcome {
    Imported {
        uid: String,
        title: String,
        folder_id: Option<FolderId>,
    },
    Failed {
        uid: String,
        title: String,
        error: MigrateError,
    },
    /// Its source folder has no counterpart on the target.
    Skipped {
        uid: String,
        title: String,
        folder_uid: String,
    },
}

/// Counters folded from per-item outcomes. `migrated` only moves on a
/// successful import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub folders_created: usize,
    pub folders_failed: usize,
    pub total: usize,
    pub migrated: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl MigrationReport {
    fn record_folder(&mut self, outcome: &FolderOutcome) {
        match outcome {
            FolderOutcome::Created {
                source_uid,
                title,
                target_id,
            } => {
                self.folders_created += 1;
                tracing::info!("Created folder: {title}");
                tracing::debug!("folder {source_uid} -> {target_id}");
            }
            FolderOutcome::Failed {
                source_uid,
                title,
                error,
            } => {
                self.folders_failed += 1;
                tracing::warn!("Error creating folder {title} ({source_uid}): {error}");
            }
        }
    }

    fn record_dashboard(&mut self, outcome: &DashboardOutcome) {
        match outcome {
            DashboardOutcome::Imported {
                uid,
                title,
                folder_id,
            } => {
                self.migrated += 1;
                tracing::debug!("dashboard {uid} imported");
                match folder_id {
                    Some(id) => tracing::info!("Imported dashboard: {title} into folder ID: {id}"),
                    None => tracing::info!("Imported dashboard: {title} into folder ID: none"),
                }
                tracing::info!("Progress: {}/{}", self.migrated, self.total);
            }
            DashboardOutcome::Failed { uid, title, error } => {
                self.failed += 1;
                tracing::warn!("Error migrating dashboard {title} ({uid}): {error}");
            }
            DashboardOutcome::Skipped {
                uid,
                title,
                folder_uid,
            } => {
                self.skipped += 1;
                tracing::debug!("skipped dashboard {title} ({uid}) from unmapped folder {folder_uid}");
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.migrated == self.total && self.folders_failed == 0
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} dashboards migrated ({} failed, {} skipped); {} folders created, {} failed",
            self.migrated,
            self.total,
            self.failed,
            self.skipped,
            self.folders_created,
            self.folders_failed
        )
    }
}

/// Drives a one-shot copy from a source instance to a target instance.
///
/// Phases run strictly in order: folders, enumeration, unfiled dashboards,
/// then dashboards grouped by folder. A failing item is reported and the run
/// moves on; only a failure to list folders or dashboards ends it early.
pub struct MigrationOrchestrator<'a> {
    source: &'a dyn SourceReader,
    target: &'a dyn TargetWriter,
}

impl<'a> MigrationOrchestrator<'a> {
    pub fn new(source: &'a dyn SourceReader, target: &'a dyn TargetWriter) -> Self {
        Self { source, target }
    }

    pub async fn run(&self) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();
        let mut mapping = FolderMapping::new();

        tracing::info!("Migrating folder structure...");
        let folders = self.source.list_folders().await?;
        let outcomes = FolderMapper::new(self.target)
            .map_folders(&folders, &mut mapping)
            .await;
        for outcome in &outcomes {
            report.record_folder(outcome);
        }
        tracing::info!("Mapped {} of {} folders", mapping.len(), folders.len());

        tracing::info!("Fetching dashboards...");
        let groups = partition(self.source.list_dashboards().await?);
        report.total = groups.total();

        tracing::info!("Migrating {} dashboards...", report.total);
        for dash in &groups.unfiled {
            let outcome = self.migrate_dashboard(dash, None).await;
            report.record_dashboard(&outcome);
        }

        self.migrate_filed(&groups.filed, &mapping, &mut report).await;

        tracing::info!("Done: {report}");
        Ok(report)
    }

    async fn migrate_filed(
        &self,
        groups: &[(String, Vec<DashboardSummary>)],
        mapping: &FolderMapping,
        report: &mut MigrationReport,
    ) {
        for (folder_uid, dashboards) in groups {
            let Some(folder_id) = mapping.get(folder_uid) else {
                tracing::warn!("No target folder ID for source folder UID: {folder_uid}");
                for dash in dashboards {
                    report.record_dashboard(&DashboardOutcome::Skipped {
                        uid: dash.uid.clone(),
                        title: dash.title.clone(),
                        folder_uid: folder_uid.clone(),
                    });
                }
                continue;
            };
            for dash in dashboards {
                let outcome = self.migrate_dashboard(dash, Some(folder_id)).await;
                report.record_dashboard(&outcome);
            }
        }
    }

    async fn migrate_dashboard(
        &self,
        dash: &DashboardSummary,
        folder_id: Option<FolderId>,
    ) -> DashboardOutcome {
        match self.copy_dashboard(&dash.uid, folder_id).await {
            Ok(()) => DashboardOutcome::Imported {
                uid: dash.uid.clone(),
                title: dash.title.clone(),
                folder_id,
            },
            Err(error) => DashboardOutcome::Failed {
                uid: dash.uid.clone(),
                title: dash.title.clone(),
                error,
            },
        }
    }

    async fn copy_dashboard(&self, uid: &str, folder_id: Option<FolderId>) -> Result<()> {
        let definition = self.source.fetch_dashboard(uid).await?.cleared();
        self.target.import_dashboard(&definition, folder_id).await
    }
}
