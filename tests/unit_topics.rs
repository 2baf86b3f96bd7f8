// Unit tests for topic mapping and the lookup tables.
//
// Tests TopicMapper against the built-in taxonomy (exact hits, compound
// fallback) and WooTables loading from JSON.

use woo_koppeling::woo::taxonomy::{WooCategory, WooTables};
use woo_koppeling::woo::topics::{TopicMapper, MIN_SUBSTRING_CHARS};

// ============================================================
// TopicMapper against the built-in taxonomy
// ============================================================

#[test]
fn parkeren_maps_to_traffic_topics() {
    let tables = WooTables::builtin();
    let topics = TopicMapper::new(&tables.taxonomy).map_to_topics(&["parkeren"]);
    for expected in ["verkeer", "mobiliteit", "openbare ruimte", "handhaving"] {
        assert!(topics.contains(expected), "missing {expected}");
    }
}

#[test]
fn compound_parkeertarieven_resolves_through_stem() {
    let tables = WooTables::builtin();
    let mapper = TopicMapper::new(&tables.taxonomy);

    let matches = mapper.term_matches(&["parkeertarieven"]);
    assert!(matches.iter().any(|m| m.term == "parkeer" && !m.exact));
    assert!(mapper.map_to_topics(&["parkeertarieven"]).contains("verkeer"));
}

#[test]
fn exact_hit_skips_substring_fallback() {
    let tables = WooTables::builtin();
    let matches = TopicMapper::new(&tables.taxonomy).term_matches(&["parkeren"]);
    assert_eq!(matches.len(), 1);
    assert!(matches[0].exact);
}

#[test]
fn topics_are_sorted_and_unique() {
    let tables = WooTables::builtin();
    let topics: Vec<String> = TopicMapper::new(&tables.taxonomy)
        .map_to_topics(&["afval", "parkeren", "afvalbakken"])
        .into_iter()
        .collect();
    let mut sorted = topics.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(topics, sorted);
}

#[test]
fn fragments_below_minimum_never_match_by_substring() {
    let tables = WooTables::builtin();
    let mapper = TopicMapper::new(&tables.taxonomy);
    let fragment: String = "parkeer".chars().take(MIN_SUBSTRING_CHARS - 1).collect();
    assert!(mapper.map_to_topics(&[fragment]).is_empty());
}

#[test]
fn empty_keywords_map_to_nothing() {
    let tables = WooTables::builtin();
    let none: [&str; 0] = [];
    assert!(TopicMapper::new(&tables.taxonomy).map_to_topics(&none).is_empty());
}

// ============================================================
// WooTables
// ============================================================

#[test]
fn builtin_rules_reach_every_category() {
    let tables = WooTables::builtin();
    for category in WooCategory::ALL {
        let reached = tables
            .taxonomy
            .iter()
            .flat_map(|(_, topics)| topics.iter())
            .flat_map(|topic| tables.rules.for_topic(topic))
            .any(|rule| rule.category == category);
        assert!(reached, "category {category} is unreachable");
    }
}

#[test]
fn tables_load_from_json() {
    let tables = WooTables::from_json(
        r#"{
            "terms": { "speeltuin": ["jeugd", "openbare ruimte"] },
            "rules": { "openbare ruimte": [{ "code": "3", "justification": "Inrichtingsbesluit." }] }
        }"#,
    )
    .unwrap();

    let topics = TopicMapper::new(&tables.taxonomy).map_to_topics(&["speeltuinen"]);
    assert!(topics.contains("jeugd"));
    let rules = tables.rules.for_topic("openbare ruimte");
    assert_eq!(rules[0].category, WooCategory::BestuurlijkeBesluiten);
}

#[test]
fn tables_reject_term_without_topics() {
    let result = WooTables::from_json(r#"{ "terms": { "afval": [] } }"#);
    assert!(result.is_err());
}

#[test]
fn missing_table_file_is_an_io_error() {
    let result = WooTables::load(std::path::Path::new("/nonexistent/tables.json"));
    assert!(matches!(
        result,
        Err(woo_koppeling::error::AnalysisError::Io(_))
    ));
}
