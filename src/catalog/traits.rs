// Dataset source trait: one interface over both catalogs.
//
// The CLI analyzes datasets from either catalog the same way; only the
// fetching differs. Implementations are async because every source is an
// HTTP API.

use anyhow::Result;
use async_trait::async_trait;

use super::ckan::{CkanClient, SearchQuery};
use super::dataset::Dataset;
use super::dcat::DcatClient;

/// Anything that can hand out normalized datasets.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Short name for log lines and messages.
    fn source_name(&self) -> &'static str;

    /// One dataset by its catalog identifier.
    async fn fetch_dataset(&self, id: &str) -> Result<Dataset>;

    /// Up to `limit` datasets matching `query` (all datasets when `None`).
    async fn fetch_datasets(&self, query: Option<&str>, limit: usize) -> Result<Vec<Dataset>>;
}

#[async_trait]
impl DatasetSource for DcatClient {
    fn source_name(&self) -> &'static str {
        "open.utrecht.nl"
    }

    async fn fetch_dataset(&self, id: &str) -> Result<Dataset> {
        self.get_dataset(id).await
    }

    async fn fetch_datasets(&self, query: Option<&str>, limit: usize) -> Result<Vec<Dataset>> {
        self.search_datasets(query, limit).await
    }
}

#[async_trait]
impl DatasetSource for CkanClient {
    fn source_name(&self) -> &'static str {
        "data.overheid.nl"
    }

    async fn fetch_dataset(&self, id: &str) -> Result<Dataset> {
        self.get_dataset(id).await
    }

    async fn fetch_datasets(&self, query: Option<&str>, limit: usize) -> Result<Vec<Dataset>> {
        let search = self
            .search_datasets(&SearchQuery {
                query: query.map(str::to_string),
                rows: u32::try_from(limit).unwrap_or(u32::MAX),
                ..Default::default()
            })
            .await?;
        Ok(search.datasets())
    }
}
