use async_trait::async_trait;

use super::{Connection, SourceReader};
use crate::error::Result;
use crate::model::dashboard::{DashboardDefinition, DashboardEnvelope, DashboardSummary};
use crate::model::folder::Folder;

pub struct HttpSource {
    conn: Connection,
}

impl HttpSource {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SourceReader for HttpSource {
    async fn list_folders(&self) -> Result<Vec<Folder>> {
        self.conn.get_json("/api/folders").await
    }

    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>> {
        self.conn.get_json("/api/search?type=dash-db").await
    }

    async fn fetch_dashboard(&self, uid: &str) -> Result<DashboardDefinition> {
        let path = format!("/api/dashboards/uid/{}", urlencoding::encode(uid));
        let envelope: DashboardEnvelope = self.conn.get_json(&path).await?;
        Ok(envelope.dashboard)
    }
}
