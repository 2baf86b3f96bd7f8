// Topic mapping: keywords to canonical topics via the taxonomy.
//
// Exact dictionary hits win. A keyword without an exact entry falls back to
// substring containment against every taxonomy term, which recovers Dutch
// compounds: "afvalbakken" contains "afval", "parkeertarieven" contains
// "parkeer". The contained side must be at least MIN_SUBSTRING_CHARS long so
// short fragments like "bus" never match by accident.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::taxonomy::TopicTaxonomy;

/// Minimum length (in characters) of the contained string for a substring match.
pub const MIN_SUBSTRING_CHARS: usize = 4;

/// Which taxonomy term a keyword resolved through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMatch {
    pub keyword: String,
    pub term: String,
    /// False when found by the substring fallback
    pub exact: bool,
}

impl TopicMatch {
    /// One-line explanation, e.g. `afvalbakken → afval (substring)`.
    pub fn describe(&self) -> String {
        let how = if self.exact { "exact" } else { "substring" };
        format!("{} → {} ({how})", self.keyword, self.term)
    }
}

/// Expands keywords to topics using a borrowed taxonomy.
pub struct TopicMapper<'a> {
    taxonomy: &'a TopicTaxonomy,
}

impl<'a> TopicMapper<'a> {
    pub fn new(taxonomy: &'a TopicTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Union of the topics of every matching term. Unmatched keywords are dropped.
    pub fn map_to_topics<S: AsRef<str>>(&self, keywords: &[S]) -> BTreeSet<String> {
        self.topics_for(&self.term_matches(keywords))
    }

    /// Union of the topics behind already computed matches.
    pub fn topics_for(&self, matches: &[TopicMatch]) -> BTreeSet<String> {
        matches
            .iter()
            .filter_map(|m| self.taxonomy.get(&m.term))
            .flat_map(|topics| topics.iter().cloned())
            .collect()
    }

    /// Every (keyword, term) link that contributes topics, in keyword order.
    pub fn term_matches<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<TopicMatch> {
        let mut matches = Vec::new();

        for keyword in keywords {
            let keyword = keyword.as_ref();

            if self.taxonomy.get(keyword).is_some() {
                matches.push(TopicMatch {
                    keyword: keyword.to_string(),
                    term: keyword.to_string(),
                    exact: true,
                });
                continue;
            }

            for (term, _) in self.taxonomy.iter() {
                if substring_match(keyword, term) {
                    matches.push(TopicMatch {
                        keyword: keyword.to_string(),
                        term: term.to_string(),
                        exact: false,
                    });
                }
            }
        }

        matches
    }
}

/// True when one string contains the other and the contained one is long enough.
fn substring_match(keyword: &str, term: &str) -> bool {
    let long_enough = |s: &str| s.chars().count() >= MIN_SUBSTRING_CHARS;
    (long_enough(term) && keyword.contains(term)) || (long_enough(keyword) && term.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> TopicTaxonomy {
        TopicTaxonomy::new(vec![
            ("afval", vec!["milieu", "beheer"]),
            ("parkeer", vec!["verkeer"]),
            ("bus", vec!["openbaar vervoer"]),
            ("gemeenteraad", vec!["bestuur"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_match() {
        let tax = taxonomy();
        let topics = TopicMapper::new(&tax).map_to_topics(&["afval"]);
        assert_eq!(
            topics.into_iter().collect::<Vec<_>>(),
            vec!["beheer", "milieu"]
        );
    }

    #[test]
    fn test_compound_word_falls_back_to_substring() {
        let tax = taxonomy();
        let mapper = TopicMapper::new(&tax);
        assert!(mapper.map_to_topics(&["parkeertarieven"]).contains("verkeer"));

        let matches = mapper.term_matches(&["afvalbakken"]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].term, "afval");
        assert!(!matches[0].exact);
    }

    #[test]
    fn test_keyword_inside_longer_term() {
        let tax = taxonomy();
        let topics = TopicMapper::new(&tax).map_to_topics(&["gemeente"]);
        assert!(topics.contains("bestuur"));
    }

    #[test]
    fn test_short_terms_need_exact_match() {
        let tax = taxonomy();
        let mapper = TopicMapper::new(&tax);
        assert!(mapper.map_to_topics(&["busbaan"]).is_empty());
        assert!(mapper.map_to_topics(&["bus"]).contains("openbaar vervoer"));
    }

    #[test]
    fn test_describe_names_match_kind() {
        let tax = taxonomy();
        let matches = TopicMapper::new(&tax).term_matches(&["afval", "afvalbakken"]);
        let lines: Vec<String> = matches.iter().map(TopicMatch::describe).collect();
        assert_eq!(
            lines,
            vec!["afval → afval (exact)", "afvalbakken → afval (substring)"]
        );
    }

    #[test]
    fn test_unknown_keywords_are_dropped() {
        let tax = taxonomy();
        let topics = TopicMapper::new(&tax).map_to_topics(&["overzicht", "utrecht"]);
        assert!(topics.is_empty());
    }
}
