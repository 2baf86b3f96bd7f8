// Category matching: topics to Woo information categories.
//
// A category can be reached from several topics. The report keeps one entry
// per category code, ordered by the fixed 1a..4 enumeration rather than by
// whichever topic happened to be found first, so the output is stable.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::taxonomy::{CategoryRules, WooCategory};

/// A Woo category matched for a dataset, with the reason it was matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub code: WooCategory,
    pub label: String,
    pub justification: String,
    /// Topic whose rule produced this entry
    pub topic: String,
}

/// Maps topic sets to categories using a borrowed rule table.
pub struct CategoryMatcher<'a> {
    rules: &'a CategoryRules,
}

impl<'a> CategoryMatcher<'a> {
    pub fn new(rules: &'a CategoryRules) -> Self {
        Self { rules }
    }

    /// One entry per reached category, in 1a..4 order.
    ///
    /// Topics are visited in sorted order; when a code is reached more than
    /// once the justification of the first topic is kept.
    pub fn match_categories(&self, topics: &BTreeSet<String>) -> Vec<CategoryMatch> {
        let mut by_code: BTreeMap<WooCategory, CategoryMatch> = BTreeMap::new();

        for topic in topics {
            for rule in self.rules.for_topic(topic) {
                if let Entry::Vacant(slot) = by_code.entry(rule.category) {
                    slot.insert(CategoryMatch {
                        code: rule.category,
                        label: rule.category.label().to_string(),
                        justification: rule.justification.clone(),
                        topic: topic.clone(),
                    });
                }
            }
        }

        by_code.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::woo::taxonomy::CategoryRule;

    fn rule(category: WooCategory, justification: &str) -> CategoryRule {
        CategoryRule {
            category,
            justification: justification.to_string(),
        }
    }

    fn rules() -> CategoryRules {
        CategoryRules::new(vec![
            (
                "verkeer",
                vec![
                    rule(WooCategory::BestuurlijkeBesluiten, "verkeersbesluit"),
                    rule(WooCategory::Onderzoeksrapporten, "verkeerstelling"),
                ],
            ),
            (
                "handhaving",
                vec![rule(WooCategory::BestuurlijkeBesluiten, "handhavingsbesluit")],
            ),
            ("mobiliteit", vec![rule(WooCategory::Jaarplannen, "mobiliteitsplan")]),
        ])
    }

    fn topics(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorted_by_enumeration_order() {
        let rules = rules();
        let matches = CategoryMatcher::new(&rules)
            .match_categories(&topics(&["verkeer", "mobiliteit"]));
        let codes: Vec<&str> = matches.iter().map(|m| m.code.code()).collect();
        assert_eq!(codes, vec!["1b", "1c", "3"]);
    }

    #[test]
    fn test_duplicate_code_keeps_first_topic() {
        let rules = rules();
        let matches = CategoryMatcher::new(&rules)
            .match_categories(&topics(&["verkeer", "handhaving"]));
        let besluit = matches
            .iter()
            .find(|m| m.code == WooCategory::BestuurlijkeBesluiten)
            .unwrap();
        // "handhaving" sorts before "verkeer"
        assert_eq!(besluit.justification, "handhavingsbesluit");
        assert_eq!(besluit.topic, "handhaving");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_no_rules_is_empty_not_error() {
        let rules = rules();
        let matches = CategoryMatcher::new(&rules).match_categories(&topics(&["cultuur"]));
        assert!(matches.is_empty());
    }

    #[test]
    fn test_label_comes_from_category() {
        let rules = rules();
        let matches = CategoryMatcher::new(&rules).match_categories(&topics(&["mobiliteit"]));
        assert_eq!(matches[0].label, "Jaarplannen en jaarverslagen");
    }
}
