use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Connection, TargetWriter};
use crate::error::Result;
use crate::model::dashboard::DashboardDefinition;
use crate::model::folder::{CreatedFolder, FolderId};

pub const DEFAULT_MESSAGE: &str = "Dashboard imported via migration script";

pub struct HttpTarget {
    conn: Connection,
    message: String,
}

impl HttpTarget {
    pub fn new(conn: Connection, message: String) -> Self {
        Self { conn, message }
    }
}

#[derive(Serialize)]
struct CreateFolderRequest<'a> {
    title: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest<'a> {
    dashboard: &'a DashboardDefinition,
    overwrite: bool,
    message: &'a str,
    folder_id: Option<FolderId>,
}

#[derive(Deserialize)]
struct ImportResponse {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[async_trait]
impl TargetWriter for HttpTarget {
    async fn create_folder(&self, title: &str) -> Result<FolderId> {
        let created: CreatedFolder = self
            .conn
            .post_json("/api/folders", &CreateFolderRequest { title })
            .await?;
        tracing::debug!(
            "target folder {} minted id {} uid {}",
            created.title.as_deref().unwrap_or(title),
            created.id,
            created.uid.as_deref().unwrap_or("-")
        );
        Ok(created.id)
    }

    async fn import_dashboard(
        &self,
        dashboard: &DashboardDefinition,
        folder_id: Option<FolderId>,
    ) -> Result<()> {
        let body = ImportRequest {
            dashboard,
            overwrite: true,
            message: &self.message,
            folder_id,
        };
        let resp: ImportResponse = self.conn.post_json("/api/dashboards/db", &body).await?;
        tracing::debug!(
            "target stored {} as uid {} ({})",
            dashboard.title,
            resp.uid.as_deref().unwrap_or("-"),
            resp.status.as_deref().unwrap_or("ok")
        );
        Ok(())
    }
}
