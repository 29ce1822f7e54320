use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use super::{MigrationOrchestrator, MigrationReport};
use crate::error::{MigrateError, Result};
use crate::grafana::{SourceReader, TargetWriter};
use crate::model::dashboard::{DashboardDefinition, DashboardSummary};
use crate::model::folder::{Folder, FolderId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    CreateFolder(String),
    Import {
        title: String,
        id: Option<i64>,
        uid: Option<String>,
        folder_id: Option<FolderId>,
    },
}

fn boom(what: &str) -> MigrateError {
    MigrateError::status("GET", format!("http://fake/{what}"), 500, "boom")
}

/// Source with canned folders/dashboards. Every definition keeps its
/// source id/uid so clearing can be observed on the target side.
struct FakeSource {
    folders: Vec<Folder>,
    dashboards: Vec<DashboardSummary>,
    failing_fetches: HashSet<String>,
    fail_listing: bool,
}

impl FakeSource {
    fn new(folders: &[(&str, &str)], dashboards: &[(&str, &str, &str)]) -> Self {
        Self {
            folders: folders
                .iter()
                .map(|(uid, title)| Folder {
                    uid: uid.to_string(),
                    title: title.to_string(),
                })
                .collect(),
            dashboards: dashboards
                .iter()
                .map(|(uid, title, folder)| DashboardSummary {
                    uid: uid.to_string(),
                    title: title.to_string(),
                    folder_uid: folder.to_string(),
                })
                .collect(),
            failing_fetches: HashSet::new(),
            fail_listing: false,
        }
    }

    fn failing_fetch(mut self, uid: &str) -> Self {
        self.failing_fetches.insert(uid.to_string());
        self
    }

    fn with_listing_failure(mut self) -> Self {
        self.fail_listing = true;
        self
    }
}

#[async_trait]
impl SourceReader for FakeSource {
    async fn list_folders(&self) -> Result<Vec<Folder>> {
        if self.fail_listing {
            return Err(boom("api/folders"));
        }
        Ok(self.folders.clone())
    }

    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>> {
        Ok(self.dashboards.clone())
    }

    async fn fetch_dashboard(&self, uid: &str) -> Result<DashboardDefinition> {
        if self.failing_fetches.contains(uid) {
            return Err(boom(uid));
        }
        let summary = self
            .dashboards
            .iter()
            .find(|d| d.uid == uid)
            .ok_or_else(|| boom(uid))?;
        Ok(serde_json::from_value(json!({
            "id": 42,
            "uid": uid,
            "title": summary.title,
            "panels": [{"type": "timeseries"}]
        }))
        .unwrap())
    }
}

/// Target that records every call. Folder ids come from `ids` by title,
/// falling back to a counter starting at 100.
struct FakeTarget {
    calls: Arc<Mutex<Vec<Call>>>,
    ids: HashMap<String, FolderId>,
    next_id: Mutex<FolderId>,
    failing_folders: HashSet<String>,
    failing_imports: HashSet<String>,
}

impl FakeTarget {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            ids: HashMap::new(),
            next_id: Mutex::new(100),
            failing_folders: HashSet::new(),
            failing_imports: HashSet::new(),
        }
    }

    fn with_id(mut self, title: &str, id: FolderId) -> Self {
        self.ids.insert(title.to_string(), id);
        self
    }

    fn failing_folder(mut self, title: &str) -> Self {
        self.failing_folders.insert(title.to_string());
        self
    }

    fn failing_import(mut self, title: &str) -> Self {
        self.failing_imports.insert(title.to_string());
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn imports(&self) -> Vec<(String, Option<FolderId>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Import {
                    title, folder_id, ..
                } => Some((title, folder_id)),
                Call::CreateFolder(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl TargetWriter for FakeTarget {
    async fn create_folder(&self, title: &str) -> Result<FolderId> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::CreateFolder(title.to_string()));
        if self.failing_folders.contains(title) {
            return Err(boom("api/folders"));
        }
        if let Some(id) = self.ids.get(title) {
            return Ok(*id);
        }
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        Ok(*next)
    }

    async fn import_dashboard(
        &self,
        dashboard: &DashboardDefinition,
        folder_id: Option<FolderId>,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Import {
            title: dashboard.title.clone(),
            id: dashboard.id,
            uid: dashboard.uid.clone(),
            folder_id,
        });
        if self.failing_imports.contains(&dashboard.title) {
            return Err(boom("api/dashboards/db"));
        }
        Ok(())
    }
}

fn scenario_source() -> FakeSource {
    FakeSource::new(
        &[("f1", "Ops")],
        &[("d1", "CPU", "f1"), ("d2", "Mem", "")],
    )
}

async fn run(source: &FakeSource, target: &FakeTarget) -> MigrationReport {
    MigrationOrchestrator::new(source, target)
        .run()
        .await
        .unwrap()
}

#[tokio::test]
async fn scenario_a_everything_succeeds() {
    let source = scenario_source();
    let target = FakeTarget::new().with_id("Ops", 7);

    let report = run(&source, &target).await;

    assert_eq!(target.calls()[0], Call::CreateFolder("Ops".into()));
    assert_eq!(
        target.imports(),
        vec![("Mem".to_string(), None), ("CPU".to_string(), Some(7))]
    );
    assert_eq!(report.migrated, 2);
    assert_eq!(report.total, 2);
    assert!(report.is_complete());
}

#[tokio::test]
async fn scenario_b_failed_folder_skips_its_dashboards() {
    let source = scenario_source();
    let target = FakeTarget::new().failing_folder("Ops");

    let report = run(&source, &target).await;

    assert_eq!(target.imports(), vec![("Mem".to_string(), None)]);
    assert_eq!(report.migrated, 1);
    assert_eq!(report.total, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.folders_failed, 1);
    assert!(!report.is_complete());
}

#[tokio::test]
async fn scenario_c_failed_fetch_does_not_stop_others() {
    let source = scenario_source().failing_fetch("d2");
    let target = FakeTarget::new().with_id("Ops", 7);

    let report = run(&source, &target).await;

    assert_eq!(target.imports(), vec![("CPU".to_string(), Some(7))]);
    assert_eq!(report.migrated, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.skipped, 0);
}

#[tokio::test]
async fn imported_definitions_have_identity_cleared() {
    let source = scenario_source();
    let target = FakeTarget::new();

    run(&source, &target).await;

    let imports: Vec<Call> = target
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Import { .. }))
        .collect();
    assert_eq!(imports.len(), 2);
    for call in imports {
        if let Call::Import { id, uid, .. } = call {
            assert_eq!(id, None);
            assert_eq!(uid, None);
        }
    }
}

#[tokio::test]
async fn failed_import_is_not_counted_and_run_continues() {
    let source = FakeSource::new(
        &[],
        &[("a", "A", ""), ("b", "B", ""), ("c", "C", "")],
    );
    let target = FakeTarget::new().failing_import("B");

    let report = run(&source, &target).await;

    let titles: Vec<String> = target.imports().into_iter().map(|(t, _)| t).collect();
    assert_eq!(titles, ["A", "B", "C"]);
    assert_eq!(report.migrated, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.total, 3);
}

#[tokio::test]
async fn failed_folder_does_not_stop_later_folders() {
    let source = FakeSource::new(
        &[("f1", "Ops"), ("f2", "Dev")],
        &[("d1", "CPU", "f1"), ("d2", "Build", "f2")],
    );
    let target = FakeTarget::new().failing_folder("Ops").with_id("Dev", 9);

    let report = run(&source, &target).await;

    assert_eq!(target.imports(), vec![("Build".to_string(), Some(9))]);
    assert_eq!(report.folders_created, 1);
    assert_eq!(report.folders_failed, 1);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn each_folder_maps_to_its_own_target_id() {
    let source = FakeSource::new(
        &[("f1", "Ops"), ("f2", "Dev")],
        &[("d1", "CPU", "f2"), ("d2", "Build", "f1"), ("d3", "Disk", "f2")],
    );
    let target = FakeTarget::new().with_id("Ops", 7).with_id("Dev", 9);

    run(&source, &target).await;

    assert_eq!(
        target.imports(),
        vec![
            ("CPU".to_string(), Some(9)),
            ("Disk".to_string(), Some(9)),
            ("Build".to_string(), Some(7)),
        ]
    );
}

#[tokio::test]
async fn folders_are_created_before_any_import() {
    let source = FakeSource::new(
        &[("f1", "Ops"), ("f2", "Dev"), ("f3", "Empty")],
        &[("d1", "CPU", "f1"), ("d2", "Mem", ""), ("d3", "Build", "f2")],
    );
    let target = FakeTarget::new();

    run(&source, &target).await;

    let calls = target.calls();
    let last_folder = calls
        .iter()
        .rposition(|c| matches!(c, Call::CreateFolder(_)))
        .unwrap();
    let first_import = calls
        .iter()
        .position(|c| matches!(c, Call::Import { .. }))
        .unwrap();
    assert_eq!(last_folder, 2);
    assert!(last_folder < first_import);
}

#[tokio::test]
async fn unfiled_dashboards_go_first() {
    let source = FakeSource::new(
        &[("f1", "Ops")],
        &[("d1", "CPU", "f1"), ("d2", "Mem", ""), ("d3", "Net", "f1"), ("d4", "Home", "")],
    );
    let target = FakeTarget::new().with_id("Ops", 7);

    run(&source, &target).await;

    assert_eq!(
        target.imports(),
        vec![
            ("Mem".to_string(), None),
            ("Home".to_string(), None),
            ("CPU".to_string(), Some(7)),
            ("Net".to_string(), Some(7)),
        ]
    );
}

#[tokio::test]
async fn dashboards_in_unknown_folder_are_never_imported() {
    let source = FakeSource::new(&[], &[("d1", "Orphan", "ghost")]);
    let target = FakeTarget::new();

    let report = run(&source, &target).await;

    assert!(target.calls().is_empty());
    assert_eq!(report.migrated, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.total, 1);
}

#[tokio::test]
async fn duplicate_source_folder_is_created_once() {
    let source = FakeSource::new(&[("f1", "Ops"), ("f1", "Ops")], &[]);
    let target = FakeTarget::new();

    let report = run(&source, &target).await;

    assert_eq!(target.calls(), vec![Call::CreateFolder("Ops".into())]);
    assert_eq!(report.folders_created, 1);
}

#[tokio::test]
async fn same_title_folders_are_each_created() {
    let source = FakeSource::new(&[("f1", "Ops"), ("f2", "Ops")], &[]);
    let target = FakeTarget::new();

    let report = run(&source, &target).await;

    assert_eq!(
        target.calls(),
        vec![
            Call::CreateFolder("Ops".into()),
            Call::CreateFolder("Ops".into())
        ]
    );
    assert_eq!(report.folders_created, 2);
}

#[tokio::test]
async fn listing_failure_aborts_before_any_write() {
    let source = scenario_source().with_listing_failure();
    let target = FakeTarget::new();

    let result = MigrationOrchestrator::new(&source, &target).run().await;

    assert!(result.is_err());
    assert!(target.calls().is_empty());
}

#[test]
fn report_summary_reads_naturally() {
    let report = MigrationReport {
        folders_created: 1,
        folders_failed: 0,
        total: 2,
        migrated: 1,
        failed: 1,
        skipped: 0,
    };
    assert_eq!(
        report.to_string(),
        "1/2 dashboards migrated (1 failed, 0 skipped); 1 folders created, 0 failed"
    );
}
