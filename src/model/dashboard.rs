use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A search hit for a dashboard on the source instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub uid: String,
    pub title: String,
    /// Empty when the dashboard lives at the root ("General").
    #[serde(default, deserialize_with = "null_as_empty")]
    pub folder_uid: String,
}

impl DashboardSummary {
    pub fn is_unfiled(&self) -> bool {
        self.folder_uid.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Full dashboard model. Everything besides the instance-assigned
/// `id`/`uid` pair and the title is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardDefinition {
    pub id: Option<i64>,
    pub uid: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl DashboardDefinition {
    /// Drops the identity pair so the target mints its own.
    pub fn cleared(self) -> Self {
        Self {
            id: None,
            uid: None,
            ..self
        }
    }
}

/// Envelope returned by `GET /api/dashboards/uid/{uid}`.
#[derive(Debug, Deserialize)]
pub struct DashboardEnvelope {
    pub dashboard: DashboardDefinition,
}
