use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use woo_koppeling::catalog::ckan::{CkanClient, SearchQuery};
use woo_koppeling::catalog::dcat::DcatClient;
use woo_koppeling::catalog::DatasetSource;
use woo_koppeling::config::Config;
use woo_koppeling::output::terminal;
use woo_koppeling::woo::WooAnalyzer;

/// Woo-koppeling: link open-data datasets to Woo information categories.
///
/// Fetches datasets from the Utrecht open-data API or data.overheid.nl and
/// reports which Woo categories a requester should search for related
/// government documents.
#[derive(Parser)]
#[command(name = "woo-koppeling", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search datasets in the Utrecht catalog
    Search {
        /// Text to look for in title, description, keywords or id
        query: Option<String>,

        /// Max results to show (default: 20)
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show one Utrecht dataset
    Get {
        /// The dataset id
        id: String,
    },

    /// List the download formats of a Utrecht dataset
    Formats {
        /// The dataset id
        id: String,
    },

    /// Analyze a Utrecht dataset for Woo connections
    Analyze {
        /// The dataset id
        id: String,

        /// Print the structured report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find Utrecht datasets related to a topic or Woo category
    Related {
        /// Topic (e.g. "verkeer") or part of a category label (e.g. "besluiten")
        topic: String,

        /// Max results to show (default: 20)
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Search datasets on data.overheid.nl
    OverheidSearch {
        /// Free-text query (default: everything)
        query: Option<String>,

        /// Restrict to one organisation (e.g. gemeente-utrecht)
        #[arg(long)]
        organization: Option<String>,

        /// Restrict to a tag; repeat for more
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Restrict to a license id (e.g. cc-zero, cc-by-4.0)
        #[arg(long)]
        license: Option<String>,

        /// Max results to fetch (default: 20, capped at 1000)
        #[arg(short = 'n', long, default_value = "20")]
        limit: u32,
    },

    /// Show one data.overheid.nl dataset
    OverheidGet {
        /// The dataset name or id
        id: String,
    },

    /// Analyze a data.overheid.nl dataset for Woo connections
    OverheidAnalyze {
        /// The dataset name or id
        id: String,

        /// Print the structured report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List organisations publishing on data.overheid.nl
    Organizations {
        /// Max organisations to show (default: 50)
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },

    /// Show one data.overheid.nl organisation
    Organization {
        /// The organisation name or id
        id: String,

        /// Also list its datasets
        #[arg(long)]
        datasets: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("woo_koppeling=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Search { query, limit } => {
            let client = dcat_client(&config)?;
            let pb = spinner("Datasets ophalen...")?;
            let datasets = client.list_datasets().await;
            pb.finish_and_clear();
            let datasets = datasets?;

            let total = datasets.len();
            let hits =
                woo_koppeling::catalog::dcat::filter_datasets(datasets, query.as_deref(), limit);
            info!(total, shown = hits.len(), "Searched Utrecht catalog");
            terminal::display_dataset_list(&hits, total);
        }

        Commands::Get { id } => {
            let client = dcat_client(&config)?;
            let raw = client.get_dataset_raw(&id).await?;
            let dataset = woo_koppeling::catalog::dataset::normalize_dcat(&raw)?;
            terminal::display_dataset_detail(&dataset, &raw);
        }

        Commands::Formats { id } => {
            let client = dcat_client(&config)?;
            let distributions = client.get_distributions(&id).await?;
            terminal::display_distributions(&id, &distributions);
        }

        Commands::Analyze { id, json } => {
            let analyzer = config.analyzer()?;
            let client = dcat_client(&config)?;
            analyze_dataset(&client, &analyzer, &id, json).await?;
        }

        Commands::Related { topic, limit } => {
            let analyzer = config.analyzer()?;
            let client = dcat_client(&config)?;
            let pb = spinner("Datasets ophalen en analyseren...")?;
            let datasets = client.fetch_datasets(None, usize::MAX).await;
            pb.finish_and_clear();
            let datasets = datasets?;
            info!(
                source = client.source_name(),
                candidates = datasets.len(),
                "Fetched candidate datasets"
            );

            let mut related = analyzer.find_related_analyses(&topic, &datasets);
            related.truncate(limit);
            terminal::display_related(&topic, &related);
        }

        Commands::OverheidSearch {
            query,
            organization,
            tags,
            license,
            limit,
        } => {
            let client = ckan_client(&config)?;
            let search = client
                .search_datasets(&SearchQuery {
                    query,
                    organization,
                    tags,
                    license,
                    rows: limit,
                    start: 0,
                })
                .await?;
            terminal::display_package_search(&search, |name| client.dataset_url(name));
        }

        Commands::OverheidGet { id } => {
            let client = ckan_client(&config)?;
            let raw = client.get_package(&id).await?;
            let dataset = woo_koppeling::catalog::dataset::normalize_ckan(&raw)?;
            let url = client.dataset_url(&dataset.identifier);
            terminal::display_package_detail(&dataset, &raw, &url, |resource_id| {
                client.resource_url(&dataset.identifier, resource_id)
            });
        }

        Commands::OverheidAnalyze { id, json } => {
            let analyzer = config.analyzer()?;
            let client = ckan_client(&config)?;
            let dataset_id = analyze_dataset(&client, &analyzer, &id, json).await?;
            if !json {
                println!("{} {}", "Dataset:".dimmed(), client.dataset_url(&dataset_id));
            }
        }

        Commands::Organizations { limit } => {
            let client = ckan_client(&config)?;
            let pb = spinner("Organisaties ophalen...")?;
            let organizations = client.list_organizations().await;
            pb.finish_and_clear();
            terminal::display_organizations(&organizations?, limit);
        }

        Commands::Organization { id, datasets } => {
            let client = ckan_client(&config)?;
            let org = client.get_organization(&id, datasets).await?;
            terminal::display_organization_detail(&org);
        }
    }

    Ok(())
}

/// Fetch one dataset from a catalog and print its Woo report.
///
/// Returns the normalized identifier so callers can link back to the catalog.
async fn analyze_dataset(
    source: &dyn DatasetSource,
    analyzer: &WooAnalyzer,
    id: &str,
    json: bool,
) -> Result<String> {
    let dataset = source
        .fetch_dataset(id)
        .await
        .with_context(|| format!("Failed to fetch dataset {id} from {}", source.source_name()))?;
    let report = analyzer.report(&dataset)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        terminal::display_report(&report);
    }
    Ok(dataset.identifier)
}

fn dcat_client(config: &Config) -> Result<DcatClient> {
    DcatClient::new(&config.utrecht_api_url, config.utrecht_api_token.clone())
}

fn ckan_client(config: &Config) -> Result<CkanClient> {
    CkanClient::new(&config.dataoverheid_api_url, &config.dataoverheid_portal_url)
}

/// Spinner on stderr while a slow request is in flight.
fn spinner(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("  {spinner} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
