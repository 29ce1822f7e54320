use std::collections::{HashMap, HashSet};

use crate::grafana::TargetWriter;
use crate::model::folder::{Folder, FolderId};

use super::orchestrator::FolderOutcome;

/// Source folder uid -> target folder id. Entries are only ever added.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderMapping {
    entries: HashMap<String, FolderId>,
}

impl FolderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the first target id seen for `source_uid`; later writes are ignored.
    fn record(&mut self, source_uid: &str, target_id: FolderId) -> bool {
        if self.entries.contains_key(source_uid) {
            return false;
        }
        self.entries.insert(source_uid.to_string(), target_id);
        true
    }

    pub fn get(&self, source_uid: &str) -> Option<FolderId> {
        self.entries.get(source_uid).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Recreates source folders on the target and fills a [`FolderMapping`].
pub struct FolderMapper<'a> {
    target: &'a dyn TargetWriter,
}

impl<'a> FolderMapper<'a> {
    pub fn new(target: &'a dyn TargetWriter) -> Self {
        Self { target }
    }

    /// One creation call per distinct source uid. A failed folder leaves no
    /// entry behind and is not retried.
    pub async fn map_folders(
        &self,
        folders: &[Folder],
        mapping: &mut FolderMapping,
    ) -> Vec<FolderOutcome> {
        let mut attempted: HashSet<&str> = HashSet::new();
        let mut outcomes = Vec::with_capacity(folders.len());

        for folder in folders {
            if !attempted.insert(folder.uid.as_str()) {
                tracing::debug!("folder uid {} listed twice, skipping", folder.uid);
                continue;
            }
            let outcome = match self.target.create_folder(&folder.title).await {
                Ok(target_id) => {
                    mapping.record(&folder.uid, target_id);
                    FolderOutcome::Created {
                        source_uid: folder.uid.clone(),
                        title: folder.title.clone(),
                        target_id,
                    }
                }
                Err(error) => FolderOutcome::Failed {
                    source_uid: folder.uid.clone(),
                    title: folder.title.clone(),
                    error,
                },
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}
