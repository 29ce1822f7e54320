use std::collections::HashMap;

use crate::model::dashboard::DashboardSummary;

/// Dashboards grouped by the source folder they came from.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DashboardGroups {
    pub unfiled: Vec<DashboardSummary>,
    /// (folder uid, dashboards) in order of first appearance.
    pub filed: Vec<(String, Vec<DashboardSummary>)>,
}

impl DashboardGroups {
    pub fn total(&self) -> usize {
        self.unfiled.len() + self.filed.iter().map(|(_, d)| d.len()).sum::<usize>()
    }
}

pub fn partition(dashboards: Vec<DashboardSummary>) -> DashboardGroups {
    let mut groups = DashboardGroups::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for dash in dashboards {
        if dash.is_unfiled() {
            groups.unfiled.push(dash);
            continue;
        }
        match index.get(&dash.folder_uid) {
            Some(&i) => groups.filed[i].1.push(dash),
            None => {
                index.insert(dash.folder_uid.clone(), groups.filed.len());
                groups.filed.push((dash.folder_uid.clone(), vec![dash]));
            }
        }
    }

    groups
}
