use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::ckan::{DEFAULT_CKAN_API_URL, DEFAULT_PORTAL_URL};
use crate::catalog::dcat::DEFAULT_DCAT_API_URL;
use crate::woo::report::{WooAnalyzer, DEFAULT_WOO_INDEX_URL};
use crate::woo::taxonomy::WooTables;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// value has a default except the optional token and table file.
#[derive(Debug, Clone)]
pub struct Config {
    /// Municipal DCAT API base (UTRECHT_API_URL)
    pub utrecht_api_url: String,
    /// Bearer token for the municipal API, if it ever requires one
    pub utrecht_api_token: Option<String>,
    /// CKAN action API base (DATAOVERHEID_API_URL)
    pub dataoverheid_api_url: String,
    /// Portal base for human-facing dataset links
    pub dataoverheid_portal_url: String,
    /// Woo-index page of the organisation, linked from every report
    pub woo_index_url: String,
    /// JSON file replacing the built-in taxonomy and category rules
    pub taxonomy_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utrecht_api_url: DEFAULT_DCAT_API_URL.to_string(),
            utrecht_api_token: None,
            dataoverheid_api_url: DEFAULT_CKAN_API_URL.to_string(),
            dataoverheid_portal_url: DEFAULT_PORTAL_URL.to_string(),
            woo_index_url: DEFAULT_WOO_INDEX_URL.to_string(),
            taxonomy_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            utrecht_api_url: env_or("UTRECHT_API_URL", defaults.utrecht_api_url),
            utrecht_api_token: env_opt("UTRECHT_API_TOKEN"),
            dataoverheid_api_url: env_or("DATAOVERHEID_API_URL", defaults.dataoverheid_api_url),
            dataoverheid_portal_url: env_or(
                "DATAOVERHEID_PORTAL_URL",
                defaults.dataoverheid_portal_url,
            ),
            woo_index_url: env_or("WOO_INDEX_URL", defaults.woo_index_url),
            taxonomy_path: env_opt("WOO_TAXONOMY_PATH").map(PathBuf::from),
        })
    }

    /// The lookup tables: the configured file, or the built-in ones.
    pub fn tables(&self) -> Result<WooTables> {
        match &self.taxonomy_path {
            Some(path) => WooTables::load(path).with_context(|| {
                format!(
                    "Failed to load Woo tables from {}\n\
                     Check WOO_TAXONOMY_PATH or unset it to use the built-in tables.",
                    path.display()
                )
            }),
            None => Ok(WooTables::builtin()),
        }
    }

    /// Build the analyzer once from the configured tables and Woo-index link.
    pub fn analyzer(&self) -> Result<WooAnalyzer> {
        let tables = self.tables()?;
        info!(
            terms = tables.taxonomy.len(),
            topics = tables.rules.topic_count(),
            "Woo tables ready"
        );
        Ok(WooAnalyzer::new(tables).with_woo_index_url(self.woo_index_url.clone()))
    }
}

/// Non-empty env var, or the fallback.
fn env_or(key: &str, fallback: String) -> String {
    env_opt(key).unwrap_or(fallback)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
