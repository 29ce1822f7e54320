pub mod source;
pub mod target;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{MigrateError, Result};
use crate::model::dashboard::{DashboardDefinition, DashboardSummary};
use crate::model::folder::{Folder, FolderId};

/// Read-only view of the instance dashboards are copied from.
#[async_trait]
pub trait SourceReader: Send + Sync {
    async fn list_folders(&self) -> Result<Vec<Folder>>;
    /// Dashboard-type search hits only; folders are filtered out server-side.
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>>;
    async fn fetch_dashboard(&self, uid: &str) -> Result<DashboardDefinition>;
}

/// Write access to the instance dashboards are copied into.
#[async_trait]
pub trait TargetWriter: Send + Sync {
    /// Always creates a new folder, even if one with this title exists.
    async fn create_folder(&self, title: &str) -> Result<FolderId>;
    /// Imports with overwrite set. `None` places the dashboard at the root.
    async fn import_dashboard(
        &self,
        dashboard: &DashboardDefinition,
        folder_id: Option<FolderId>,
    ) -> Result<()>;
}

/// An authenticated HTTP connection to one Grafana instance.
pub struct Connection {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl Connection {
    pub fn new(base_url: &str, token: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| MigrateError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Bearer {token}"),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let request = self.client.get(&url);
        self.send("GET", url, request).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        self.send("POST", url, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: String,
        request: RequestBuilder,
    ) -> Result<T> {
        tracing::debug!("{method} {url}");
        let resp = request
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| MigrateError::Transport {
                method,
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MigrateError::status(method, url, status.as_u16(), &body));
        }

        resp.json()
            .await
            .map_err(|source| MigrateError::Transport { method, url, source })
    }
}
