// HTTP client for the Utrecht open-data API (DCAT over JSON:API).
//
// `GET /datasets` returns every dataset in one page under `data`; search is
// a client-side filter because the API has no query parameter for it.

use anyhow::{Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::dataset::{dcat_attr, normalize_dcat, Dataset};

/// Default base URL of the municipal catalog API.
pub const DEFAULT_DCAT_API_URL: &str = "https://open.utrecht.nl/api";

/// Response of `GET /datasets` and `GET /datasets/{id}/distributions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListMeta {
    pub total: Option<u64>,
}

/// A downloadable representation of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub format: String,
    pub title: Option<String>,
    pub access_url: Option<String>,
    pub media_type: Option<String>,
    pub byte_size: Option<u64>,
}

impl Distribution {
    /// Build from a JSON:API distribution resource.
    ///
    /// Formats are often IANA URIs (`.../media-types/text/csv`); only the last
    /// path segment is kept, uppercased.
    pub fn from_resource(resource: &Value) -> Self {
        let empty = Value::Null;
        let attrs = resource.get("attributes").unwrap_or(&empty);
        let text = |key: &str| dcat_attr(attrs, key).and_then(Value::as_str).map(str::to_string);

        let format = text("format")
            .and_then(|raw| {
                if raw.contains('/') {
                    raw.rsplit('/')
                        .find(|segment| !segment.trim().is_empty())
                        .map(|segment| segment.trim().to_uppercase())
                } else {
                    Some(raw.trim().to_string()).filter(|f| !f.is_empty())
                }
            })
            .unwrap_or_else(|| "Onbekend".to_string());

        Self {
            format,
            title: text("title"),
            access_url: text("accessURL"),
            media_type: text("mediaType"),
            byte_size: dcat_attr(attrs, "byteSize").and_then(Value::as_u64),
        }
    }
}

/// Client for the municipal DCAT catalog.
pub struct DcatClient {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl DcatClient {
    /// Create a client for the given base URL, optionally authenticated.
    pub fn new(base_url: &str, bearer_token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("woo-koppeling/0.1 (open-data analysis)")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.filter(|t| !t.is_empty()),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = endpoint_url(&self.base_url, segments)?;
        let path = url.path().to_string();

        debug!(url = %url, "DCAT GET request");

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("DCAT request failed: {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("DCAT API {path} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse DCAT response for {path}"))
    }

    /// All dataset resources as returned by the API.
    pub async fn list_raw(&self) -> Result<ResourceList> {
        self.get_json(&["datasets"]).await
    }

    /// All datasets, normalized. Resources without an id are skipped.
    pub async fn list_datasets(&self) -> Result<Vec<Dataset>> {
        let list = self.list_raw().await?;
        Ok(normalize_all(&list.data))
    }

    /// Datasets whose title, description, keywords or id contain `query`.
    pub async fn search_datasets(&self, query: Option<&str>, limit: usize) -> Result<Vec<Dataset>> {
        let datasets = self.list_datasets().await?;
        Ok(filter_datasets(datasets, query, limit))
    }

    /// One dataset by id, normalized.
    pub async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset> {
        let raw = self.get_dataset_raw(dataset_id).await?;
        normalize_dcat(&raw).with_context(|| format!("Dataset {dataset_id} has no usable id"))
    }

    /// One dataset by id, as raw JSON (for detail display).
    pub async fn get_dataset_raw(&self, dataset_id: &str) -> Result<Value> {
        self.get_json(&["datasets", dataset_id]).await
    }

    /// Downloads available for a dataset.
    pub async fn get_distributions(&self, dataset_id: &str) -> Result<Vec<Distribution>> {
        let list: ResourceList = self
            .get_json(&["datasets", dataset_id, "distributions"])
            .await?;
        Ok(list.data.iter().map(Distribution::from_resource).collect())
    }
}

/// Append path segments to the API base, percent-encoding each one.
///
/// Ids may contain spaces or `/`; each id stays a single segment.
pub fn endpoint_url(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url =
        Url::parse(base_url).with_context(|| format!("Invalid DCAT API URL: {base_url}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("DCAT API URL cannot have a path: {base_url}"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Normalize a page of resources, dropping the ones without an id.
pub fn normalize_all(resources: &[Value]) -> Vec<Dataset> {
    resources
        .iter()
        .filter_map(|raw| match normalize_dcat(raw) {
            Ok(ds) => Some(ds),
            Err(e) => {
                debug!(error = %e, "Skipping DCAT resource");
                None
            }
        })
        .collect()
}

/// Case-insensitive client-side search, capped at `limit` results.
pub fn filter_datasets(datasets: Vec<Dataset>, query: Option<&str>, limit: usize) -> Vec<Dataset> {
    let query = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());

    datasets
        .into_iter()
        .filter(|ds| match &query {
            None => true,
            Some(q) => {
                ds.identifier.to_lowercase().contains(q)
                    || ds.title.as_deref().is_some_and(|t| t.to_lowercase().contains(q))
                    || ds
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(q))
                    || ds.keywords.iter().any(|k| k.to_lowercase().contains(q))
            }
        })
        .take(limit)
        .collect()
}
