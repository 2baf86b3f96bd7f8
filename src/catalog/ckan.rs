// HTTP client for data.overheid.nl, the national CKAN catalog.
//
// Every CKAN action wraps its payload in `{ success, result, error }`. The
// client unwraps that envelope and turns `success: false` into an error so
// callers only ever see the result.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::dataset::{normalize_ckan, Dataset};

/// Default CKAN action API base.
pub const DEFAULT_CKAN_API_URL: &str = "https://data.overheid.nl/data/api/3/action";
/// Default portal base, used for human-facing dataset links.
pub const DEFAULT_PORTAL_URL: &str = "https://data.overheid.nl";

/// CKAN rejects `rows` above this.
const MAX_ROWS: u32 = 1000;

#[derive(Debug, Deserialize)]
struct ActionResponse<T> {
    success: bool,
    result: Option<T>,
    error: Option<ActionError>,
}

#[derive(Debug, Deserialize)]
struct ActionError {
    message: Option<String>,
}

/// Result of `package_search`.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSearch {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<Value>,
}

impl PackageSearch {
    /// Normalize every hit; packages without a name or id are skipped.
    pub fn datasets(&self) -> Vec<Dataset> {
        self.results
            .iter()
            .filter_map(|raw| normalize_ckan(raw).ok())
            .collect()
    }
}

/// An organization as returned by `organization_list` / `organization_show`.
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub name: String,
    pub title: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub package_count: u64,
    #[serde(default)]
    pub packages: Vec<Value>,
}

impl Organization {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.display_name.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Search parameters for `package_search`.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub organization: Option<String>,
    pub tags: Vec<String>,
    /// CKAN license id, e.g. `cc-zero` or `cc-by-4.0`
    pub license: Option<String>,
    pub rows: u32,
    pub start: u32,
}

impl SearchQuery {
    /// All datasets published under one license.
    pub fn by_license(license_id: &str, rows: u32) -> Self {
        Self {
            license: Some(license_id.to_string()),
            rows,
            ..Default::default()
        }
    }

    /// Solr filter query, e.g. `organization:"gemeente-utrecht" AND tags:"afval"`.
    pub fn filter_query(&self) -> Option<String> {
        let parts: Vec<String> = self
            .organization
            .iter()
            .map(|org| format!("organization:\"{org}\""))
            .chain(self.tags.iter().map(|tag| format!("tags:\"{tag}\"")))
            .chain(self.license.iter().map(|id| format!("license_id:\"{id}\"")))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" AND "))
        }
    }

    /// Query-string pairs in the order CKAN documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![(
            "q",
            self.query
                .clone()
                .filter(|q| !q.trim().is_empty())
                .unwrap_or_else(|| "*:*".to_string()),
        )];
        if let Some(fq) = self.filter_query() {
            params.push(("fq", fq));
        }
        params.push(("rows", self.rows.min(MAX_ROWS).to_string()));
        params.push(("start", self.start.to_string()));
        params.push(("sort", "score desc, metadata_modified desc".to_string()));
        params
    }
}

/// Client for the CKAN action API.
pub struct CkanClient {
    client: reqwest::Client,
    api_base: String,
    portal_base: String,
}

impl CkanClient {
    pub fn new(api_base: &str, portal_base: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("woo-koppeling/0.1 (open-data analysis)")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            portal_base: portal_base.trim_end_matches('/').to_string(),
        })
    }

    /// Call a CKAN action and unwrap its envelope.
    pub async fn action<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.api_base, action);

        debug!(action = action, "CKAN action request");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .with_context(|| format!("CKAN request failed: {action}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("CKAN {action} returned {status}: {body}");
        }

        let envelope: ActionResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse CKAN {action} response"))?;

        unwrap_envelope(action, envelope)
    }

    pub async fn search_datasets(&self, query: &SearchQuery) -> Result<PackageSearch> {
        let result: PackageSearch = self.action("package_search", &query.params()).await?;
        info!(
            count = result.count,
            returned = result.results.len(),
            "CKAN package search"
        );
        Ok(result)
    }

    /// A package by name or id, raw.
    pub async fn get_package(&self, dataset_id: &str) -> Result<Value> {
        self.action("package_show", &[("id", dataset_id.to_string())])
            .await
    }

    /// A package by name or id, normalized.
    pub async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset> {
        let raw = self.get_package(dataset_id).await?;
        normalize_ckan(&raw).with_context(|| format!("Package {dataset_id} has no usable name"))
    }

    pub async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.action("organization_list", &[("all_fields", "true".to_string())])
            .await
    }

    pub async fn get_organization(&self, org_id: &str, include_datasets: bool) -> Result<Organization> {
        self.action(
            "organization_show",
            &[
                ("id", org_id.to_string()),
                ("include_datasets", include_datasets.to_string()),
            ],
        )
        .await
    }

    /// Portal page for a dataset.
    pub fn dataset_url(&self, dataset_name: &str) -> String {
        format!("{}/dataset/{}", self.portal_base, dataset_name)
    }

    /// Portal page for one resource of a dataset.
    pub fn resource_url(&self, dataset_name: &str, resource_id: &str) -> String {
        format!("{}/resource/{}", self.dataset_url(dataset_name), resource_id)
    }
}

fn unwrap_envelope<T>(action: &str, envelope: ActionResponse<T>) -> Result<T> {
    if !envelope.success {
        let message = envelope
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| "Unknown error".to_string());
        anyhow::bail!("CKAN {action} failed: {message}");
    }
    envelope
        .result
        .with_context(|| format!("CKAN {action} returned no result"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_combines_org_and_tags() {
        let query = SearchQuery {
            organization: Some("gemeente-utrecht".to_string()),
            tags: vec!["afval".to_string(), "milieu".to_string()],
            rows: 20,
            ..Default::default()
        };
        assert_eq!(
            query.filter_query().as_deref(),
            Some(r#"organization:"gemeente-utrecht" AND tags:"afval" AND tags:"milieu""#)
        );
    }

    #[test]
    fn test_params_default_query_and_row_cap() {
        let query = SearchQuery {
            rows: 5000,
            ..Default::default()
        };
        let params = query.params();
        assert_eq!(params[0], ("q", "*:*".to_string()));
        assert!(params.iter().all(|(k, _)| *k != "fq"));
        assert!(params.contains(&("rows", "1000".to_string())));
    }

    #[test]
    fn test_license_search_filters_on_license_id() {
        let query = SearchQuery::by_license("cc-by-4.0", 20);
        let params = query.params();
        assert!(params.contains(&("q", "*:*".to_string())));
        assert!(params.contains(&("fq", r#"license_id:"cc-by-4.0""#.to_string())));
        assert!(params.contains(&("rows", "20".to_string())));
    }

    #[test]
    fn test_envelope_failure_carries_message() {
        let envelope: ActionResponse<Value> = serde_json::from_str(
            r#"{"success": false, "error": {"message": "Not found", "__type": "Not Found Error"}}"#,
        )
        .unwrap();
        let err = unwrap_envelope("package_show", envelope).unwrap_err();
        assert!(err.to_string().contains("Not found"));
    }

    #[test]
    fn test_envelope_success_returns_result() {
        let envelope: ActionResponse<PackageSearch> = serde_json::from_str(
            r#"{"success": true, "result": {"count": 1, "results": [{"name": "bomen", "title": "Bomen"}]}}"#,
        )
        .unwrap();
        let search = unwrap_envelope("package_search", envelope).unwrap();
        assert_eq!(search.count, 1);
        assert_eq!(search.datasets()[0].identifier, "bomen");
    }
}
