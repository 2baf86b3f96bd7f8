// Composition tests: the full analysis chain from dataset to report.
//
// These tests exercise the data flow between modules:
//   normalize -> KeywordExtractor -> TopicMapper -> CategoryMatcher -> report
// without any network calls or filesystem side effects.

use serde_json::json;

use woo_koppeling::catalog::dataset::{normalize_ckan, normalize_dcat};
use woo_koppeling::catalog::Dataset;
use woo_koppeling::error::AnalysisError;
use woo_koppeling::woo::report::build_report;
use woo_koppeling::woo::taxonomy::{CategoryRules, TopicTaxonomy, WooCategory, WooTables};
use woo_koppeling::woo::topics::TopicMatch;
use woo_koppeling::woo::traits::KeywordExtractor;
use woo_koppeling::woo::WooAnalyzer;

fn afvalbakken() -> Dataset {
    Dataset::new("afvalbakken")
        .with_title("Afvalbakken")
        .with_description("Overzicht van bovengrondse afvalbakken")
        .with_keywords(["afval", "afvalbak"])
}

fn parkeren() -> Dataset {
    Dataset::new("parkeren")
        .with_title("Parkeertarieven Utrecht")
        .with_keywords(["parkeren", "tarieven"])
}

fn codes(analysis: &woo_koppeling::woo::AnalysisResult) -> Vec<&'static str> {
    analysis
        .matched_categories
        .iter()
        .map(|c| c.code.code())
        .collect()
}

// ============================================================
// Documented scenarios
// ============================================================

#[test]
fn afvalbakken_reaches_waste_topics_and_decisions() {
    let analyzer = WooAnalyzer::default();
    let result = analyzer.analyze(&afvalbakken()).unwrap();

    for keyword in ["afval", "afvalbak", "afvalbakken", "bovengrondse", "overzicht"] {
        assert!(
            result.extracted_keywords.iter().any(|k| k == keyword),
            "missing keyword {keyword}"
        );
    }
    assert!(!result.extracted_keywords.iter().any(|k| k == "van"));

    for topic in ["milieu", "openbare ruimte", "beheer"] {
        assert!(result.matched_topics.contains(topic), "missing topic {topic}");
    }
    assert!(codes(&result).contains(&"3"));
}

#[test]
fn parkeertarieven_reaches_plans_research_and_decisions() {
    let analyzer = WooAnalyzer::default();
    let result = analyzer.analyze(&parkeren()).unwrap();

    for topic in ["verkeer", "mobiliteit", "openbare ruimte"] {
        assert!(result.matched_topics.contains(topic), "missing topic {topic}");
    }
    let codes = codes(&result);
    for code in ["1b", "1c", "3"] {
        assert!(codes.contains(&code), "missing category {code}");
    }
}

#[test]
fn afvalbakken_report_explains_compound_match() {
    let analyzer = WooAnalyzer::default();
    let result = analyzer.analyze(&afvalbakken()).unwrap();
    let compound = TopicMatch {
        keyword: "afvalbakken".to_string(),
        term: "afval".to_string(),
        exact: false,
    };
    assert!(result.topic_sources.contains(&compound));

    let report = build_report(&result, analyzer.woo_index_url());
    assert_eq!(report.sources, result.topic_sources);
    assert!(report
        .render_text()
        .contains("afvalbakken → afval (substring)"));
}

// ============================================================
// Swapping the keyword extractor
// ============================================================

/// Ignores the dataset text and always yields the same terms.
struct FixedExtractor(Vec<String>);

impl KeywordExtractor for FixedExtractor {
    fn extract(&self, _dataset: &Dataset) -> Vec<String> {
        self.0.clone()
    }
}

#[test]
fn topics_come_from_the_configured_extractor() {
    let analyzer = WooAnalyzer::default()
        .with_extractor(Box::new(FixedExtractor(vec!["parkeren".to_string()])));
    let result = analyzer
        .analyze(&Dataset::new("bomen").with_title("Bomen").with_keywords(["groen"]))
        .unwrap();

    assert_eq!(result.extracted_keywords, vec!["parkeren"]);
    assert!(result.matched_topics.contains("verkeer"));
    assert!(!result.matched_topics.contains("natuur"));
}

// ============================================================
// Properties
// ============================================================

#[test]
fn empty_dataset_is_a_normal_empty_result() {
    let analyzer = WooAnalyzer::default();
    let result = analyzer.analyze(&Dataset::new("leeg")).unwrap();
    assert!(result.extracted_keywords.is_empty());
    assert!(result.matched_topics.is_empty());
    assert!(result.matched_categories.is_empty());
    assert_eq!(result.relevance_score(), 0);
    assert!(!result.has_woo_relevance());
}

#[test]
fn analysis_is_idempotent() {
    let analyzer = WooAnalyzer::default();
    let first = analyzer.analyze(&afvalbakken()).unwrap();
    let second = analyzer.analyze(&afvalbakken()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn categories_are_always_in_enumeration_order() {
    let analyzer = WooAnalyzer::default();
    let datasets = [
        afvalbakken(),
        parkeren(),
        Dataset::new("subsidies")
            .with_title("Subsidieregister jeugd en cultuur")
            .with_keywords(["subsidie", "woo", "gemeenteraad", "convenant"]),
    ];
    for dataset in &datasets {
        let result = analyzer.analyze(dataset).unwrap();
        assert!(
            result
                .matched_categories
                .windows(2)
                .all(|w| w[0].code < w[1].code),
            "unsorted categories for {}",
            dataset.identifier
        );
    }
}

#[test]
fn keywords_without_taxonomy_hits_are_not_an_error() {
    let tables = WooTables {
        taxonomy: TopicTaxonomy::new(vec![("afval", vec!["milieu"])]).unwrap(),
        rules: CategoryRules::default(),
    };
    let analyzer = WooAnalyzer::new(tables);
    let result = analyzer
        .analyze(&Dataset::new("lantaarns").with_title("Lantaarnpalen kleuren"))
        .unwrap();

    assert_eq!(result.extracted_keywords, vec!["lantaarnpalen", "kleuren"]);
    assert!(result.matched_topics.is_empty());
    assert!(result.matched_categories.is_empty());
}

#[test]
fn blank_identifier_is_the_only_failure() {
    let analyzer = WooAnalyzer::default();
    let err = analyzer.analyze(&Dataset::new("")).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidInput(_)));
}

// ============================================================
// findRelated
// ============================================================

#[test]
fn related_returns_exactly_the_matching_dataset() {
    let analyzer = WooAnalyzer::default();
    let dataset_a = parkeren();
    let dataset_b = Dataset::new("bomen").with_title("Bomen").with_keywords(["bomen"]);
    let datasets = vec![dataset_a.clone(), dataset_b];

    let related = analyzer.find_related("verkeer", &datasets);
    assert_eq!(related, vec![&dataset_a]);
}

#[test]
fn related_preserves_input_order() {
    let analyzer = WooAnalyzer::default();
    let datasets = vec![
        parkeren(),
        Dataset::new("bomen").with_title("Bomen"),
        Dataset::new("fietsparkeren").with_title("Fietsenstallingen").with_keywords(["fiets"]),
        afvalbakken(),
    ];

    let ids: Vec<&str> = analyzer
        .find_related("Openbare Ruimte ", &datasets)
        .iter()
        .map(|d| d.identifier.as_str())
        .collect();
    assert_eq!(ids, vec!["parkeren", "fietsparkeren", "afvalbakken"]);
}

#[test]
fn related_matches_category_labels() {
    let analyzer = WooAnalyzer::default();
    let datasets = vec![parkeren(), Dataset::new("bomen").with_title("Bomen")];
    let related = analyzer.find_related("besluiten", &datasets);
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].identifier, "parkeren");
}

#[test]
fn related_skips_unanalyzable_datasets() {
    let analyzer = WooAnalyzer::default();
    let datasets = vec![Dataset::new(" ").with_title("Parkeren"), parkeren()];
    let related = analyzer.find_related("verkeer", &datasets);
    assert_eq!(related.len(), 1);
    assert!(analyzer.find_related("   ", &datasets).is_empty());
}

// ============================================================
// Chain: catalog JSON -> analysis -> report
// ============================================================

#[test]
fn dcat_resource_flows_into_report() {
    let raw = json!({
        "data": {
            "id": "afvalbakken",
            "attributes": {
                "dct:title": "Afvalbakken",
                "dct:description": "Overzicht van bovengrondse afvalbakken",
                "dcat:keyword": ["afval", "afvalbak"]
            }
        }
    });
    let dataset = normalize_dcat(&raw).unwrap();
    assert_eq!(dataset, afvalbakken());

    let analyzer = WooAnalyzer::default().with_woo_index_url("https://example.org/woo");
    let report = analyzer.report(&dataset).unwrap();
    assert_eq!(report.dataset_id, "afvalbakken");
    assert_eq!(report.woo_index_url, "https://example.org/woo");
    assert!(report
        .categories
        .iter()
        .any(|c| c.code == WooCategory::BestuurlijkeBesluiten));
    assert!(report.render_text().contains("https://example.org/woo"));
}

#[test]
fn ckan_package_flows_into_report_json() {
    let raw = json!({
        "name": "parkeertarieven-utrecht",
        "title": "Parkeertarieven Utrecht",
        "notes": null,
        "tags": [{ "name": "parkeren" }, { "name": "tarieven" }]
    });
    let dataset = normalize_ckan(&raw).unwrap();
    let analyzer = WooAnalyzer::default();
    let result = analyzer.analyze(&dataset).unwrap();
    let report = build_report(&result, analyzer.woo_index_url());

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["dataset_id"], "parkeertarieven-utrecht");
    assert_eq!(value["relevance_score"], result.relevance_score());
    let first_code = value["categories"][0]["code"].as_str().unwrap();
    assert_eq!(first_code, result.matched_categories[0].code.code());
}
