// Woo analysis: composes extraction, topic mapping and category matching,
// and turns the outcome into a structured or human-readable report.
//
// Data flows one way: dataset → keywords → topics → categories → report.
// Nothing here does I/O; the analyzer only holds the read-only tables.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::categories::{CategoryMatch, CategoryMatcher};
use super::keywords::DutchKeywordExtractor;
use super::taxonomy::WooTables;
use super::topics::{TopicMatch, TopicMapper};
use super::traits::KeywordExtractor;
use crate::catalog::dataset::Dataset;
use crate::error::{AnalysisError, WooResult};

/// Woo-index page of the municipality of Utrecht.
pub const DEFAULT_WOO_INDEX_URL: &str =
    "https://organisaties.overheid.nl/woo/nl.oorg.gemutrecht_gemeente";

/// Number of longest keywords suggested as Woo-index search terms.
const SEARCH_TERM_KEYWORDS: usize = 5;
/// Number of topics appended to the search terms.
const SEARCH_TERM_TOPICS: usize = 3;

/// Outcome of analyzing one dataset. Built fresh per call, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub dataset_id: String,
    pub title: Option<String>,
    /// Extraction order, deduplicated
    pub extracted_keywords: Vec<String>,
    pub matched_topics: BTreeSet<String>,
    /// One per code, in 1a..4 order
    pub matched_categories: Vec<CategoryMatch>,
    /// How each topic-contributing keyword was resolved
    pub topic_sources: Vec<TopicMatch>,
}

impl AnalysisResult {
    /// Number of topics plus number of categories. Explains breadth, not rank.
    pub fn relevance_score(&self) -> usize {
        self.matched_topics.len() + self.matched_categories.len()
    }

    /// Suggested queries for the Woo-index: the longest keywords, then a few topics.
    pub fn search_terms(&self) -> Vec<String> {
        let mut by_length: Vec<&String> = self.extracted_keywords.iter().collect();
        // Stable sort: equal lengths keep extraction order
        by_length.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        let mut seen = BTreeSet::new();
        by_length
            .into_iter()
            .take(SEARCH_TERM_KEYWORDS)
            .chain(self.matched_topics.iter().take(SEARCH_TERM_TOPICS))
            .filter(|term| seen.insert(*term))
            .cloned()
            .collect()
    }

    pub fn has_woo_relevance(&self) -> bool {
        !self.matched_categories.is_empty()
    }
}

/// The Woo connection analyzer. Owns the lookup tables and the keyword extractor.
pub struct WooAnalyzer {
    tables: WooTables,
    extractor: Box<dyn KeywordExtractor>,
    woo_index_url: String,
}

impl Default for WooAnalyzer {
    fn default() -> Self {
        Self::new(WooTables::builtin())
    }
}

impl WooAnalyzer {
    pub fn new(tables: WooTables) -> Self {
        Self {
            tables,
            extractor: Box::new(DutchKeywordExtractor::default()),
            woo_index_url: DEFAULT_WOO_INDEX_URL.to_string(),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn KeywordExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_woo_index_url(mut self, url: impl Into<String>) -> Self {
        self.woo_index_url = url.into();
        self
    }

    pub fn woo_index_url(&self) -> &str {
        &self.woo_index_url
    }

    /// Run keyword extraction, topic mapping and category matching for one dataset.
    ///
    /// Fails only when the dataset has no identifier. Missing text, an empty
    /// keyword list or zero taxonomy hits all produce an ordinary result with
    /// empty collections.
    pub fn analyze(&self, dataset: &Dataset) -> WooResult<AnalysisResult> {
        if dataset.identifier.trim().is_empty() {
            return Err(AnalysisError::invalid_input("dataset has no identifier"));
        }

        let keywords = self.extractor.extract(dataset);

        let mapper = TopicMapper::new(&self.tables.taxonomy);
        let topic_sources = mapper.term_matches(&keywords);
        let topics = mapper.topics_for(&topic_sources);

        let categories = CategoryMatcher::new(&self.tables.rules).match_categories(&topics);

        debug!(
            dataset = %dataset.identifier,
            keywords = keywords.len(),
            topics = topics.len(),
            categories = categories.len(),
            "Analyzed dataset"
        );

        Ok(AnalysisResult {
            dataset_id: dataset.identifier.clone(),
            title: dataset.title.clone(),
            extracted_keywords: keywords,
            matched_topics: topics,
            matched_categories: categories,
            topic_sources,
        })
    }

    /// Analyze and package the result as a report in one step.
    pub fn report(&self, dataset: &Dataset) -> WooResult<WooReport> {
        let result = self.analyze(dataset)?;
        Ok(build_report(&result, &self.woo_index_url))
    }

    /// Datasets related to a topic or category, in input order.
    ///
    /// A dataset is related when its matched topics contain the term exactly,
    /// or when one of its matched category labels contains the term
    /// (case-insensitive). Datasets that cannot be analyzed are skipped.
    pub fn find_related<'d>(&self, term: &str, datasets: &'d [Dataset]) -> Vec<&'d Dataset> {
        self.find_related_analyses(term, datasets)
            .into_iter()
            .map(|related| related.dataset)
            .collect()
    }

    /// Like [`find_related`](Self::find_related), but keeps each analysis for display.
    pub fn find_related_analyses<'d>(
        &self,
        term: &str,
        datasets: &'d [Dataset],
    ) -> Vec<RelatedDataset<'d>> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let related: Vec<RelatedDataset<'d>> = datasets
            .iter()
            .filter_map(|dataset| match self.analyze(dataset) {
                Ok(analysis) => Some(RelatedDataset { dataset, analysis }),
                Err(e) => {
                    warn!(error = %e, "Skipping dataset that cannot be analyzed");
                    None
                }
            })
            .filter(|related| is_related(&related.analysis, &needle))
            .collect();

        info!(
            term = %needle,
            candidates = datasets.len(),
            related = related.len(),
            "Searched for Woo-related datasets"
        );

        related
    }
}

/// A dataset found by `find_related_analyses`, with its analysis.
#[derive(Debug, Clone)]
pub struct RelatedDataset<'d> {
    pub dataset: &'d Dataset,
    pub analysis: AnalysisResult,
}

fn is_related(analysis: &AnalysisResult, needle: &str) -> bool {
    analysis.matched_topics.contains(needle)
        || analysis
            .matched_categories
            .iter()
            .any(|c| c.label.to_lowercase().contains(needle))
}

/// Structured report for programmatic consumers; `Display` renders the text report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WooReport {
    pub dataset_id: String,
    pub title: Option<String>,
    pub keywords: Vec<String>,
    pub topics: Vec<String>,
    /// Which taxonomy term each contributing keyword resolved through
    pub sources: Vec<TopicMatch>,
    pub categories: Vec<CategoryMatch>,
    /// All category justifications joined into one paragraph
    pub recommendations: String,
    pub search_terms: Vec<String>,
    pub relevance_score: usize,
    pub woo_index_url: String,
}

/// Turn an analysis into a report. Pure presentation, no lookups.
pub fn build_report(result: &AnalysisResult, woo_index_url: &str) -> WooReport {
    let recommendations = result
        .matched_categories
        .iter()
        .map(|c| c.justification.trim())
        .filter(|j| !j.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    WooReport {
        dataset_id: result.dataset_id.clone(),
        title: result.title.clone(),
        keywords: result.extracted_keywords.clone(),
        topics: result.matched_topics.iter().cloned().collect(),
        sources: result.topic_sources.clone(),
        categories: result.matched_categories.clone(),
        recommendations,
        search_terms: result.search_terms(),
        relevance_score: result.relevance_score(),
        woo_index_url: woo_index_url.to_string(),
    }
}

impl WooReport {
    /// The multi-section text report.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

const RULE_WIDTH: usize = 70;

impl fmt::Display for WooReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        let title = self.title.as_deref().unwrap_or(&self.dataset_id);

        writeln!(f, "{rule}")?;
        writeln!(f, "WOO KOPPELING ANALYSE: {title}")?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;
        writeln!(f, "Dataset ID: {}", self.dataset_id)?;
        writeln!(f, "Relevantie score: {}", self.relevance_score)?;
        writeln!(f)?;

        write_list(f, "GEËXTRAHEERDE TREFWOORDEN:", &self.keywords, "(geen trefwoorden gevonden)")?;
        write_list(f, "GEÏDENTIFICEERDE ONDERWERPEN:", &self.topics, "(geen specifieke onderwerpen gevonden)")?;

        if !self.sources.is_empty() {
            writeln!(f, "HERKOMST ONDERWERPEN:")?;
            for source in &self.sources {
                writeln!(f, "  • {}", source.describe())?;
            }
            writeln!(f)?;
        }

        writeln!(f, "GERELATEERDE WOO CATEGORIEËN:")?;
        if self.categories.is_empty() {
            writeln!(f, "  (geen directe categorieën gevonden)")?;
        }
        for category in &self.categories {
            writeln!(f, "  • {} - {}", category.code, category.label)?;
            writeln!(f, "    Reden: {}", category.justification)?;
        }
        writeln!(f)?;

        writeln!(f, "AANBEVELINGEN:")?;
        if self.recommendations.is_empty() {
            writeln!(f, "  Geen Woo-relevantie vastgesteld voor deze dataset.")?;
        } else {
            writeln!(f, "  {}", self.recommendations)?;
        }
        writeln!(f)?;

        write_list(f, "AANBEVOLEN ZOEKTERMEN VOOR WOO-INDEX:", &self.search_terms, "(geen zoektermen)")?;

        writeln!(f, "WOO-INDEX:")?;
        writeln!(f, "  {}", self.woo_index_url)?;
        writeln!(f)?;

        writeln!(f, "HOE TE GEBRUIKEN:")?;
        writeln!(f, "  1. Bezoek de Woo-index URL hierboven")?;
        writeln!(f, "  2. Zoek naar de aanbevolen zoektermen")?;
        writeln!(f, "  3. Filter op de relevante Woo categorieën")?;
        writeln!(f, "  4. Vergelijk gevonden documenten met deze dataset")?;
        writeln!(f)?;
        write!(f, "{rule}")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, header: &str, items: &[String], empty: &str) -> fmt::Result {
    writeln!(f, "{header}")?;
    if items.is_empty() {
        writeln!(f, "  {empty}")?;
    }
    for item in items {
        writeln!(f, "  • {item}")?;
    }
    writeln!(f)
}
