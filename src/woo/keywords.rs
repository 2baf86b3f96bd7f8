// Dutch keyword extraction: tokenize, filter, deduplicate.
//
// Title and description are free text and go through the tokenizer and the
// stopword/length filter. The catalog's own keyword field is curated by the
// publisher and is taken as-is (lowercased and trimmed).

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};
use tracing::debug;

use super::traits::KeywordExtractor;
use crate::catalog::dataset::Dataset;

/// Articles, prepositions and conjunctions that always go, whatever the
/// bundled stopword list contains.
const CORE_STOPWORDS: &[&str] = &[
    "de", "het", "een", "van", "in", "op", "voor", "met", "aan", "uit", "en", "of", "maar", "is",
    "zijn", "was", "waren", "deze", "dit", "die", "dat", "door", "naar", "bij", "om", "te", "tot",
    "over", "onder", "tussen", "na", "als", "dan",
];

/// Tokenizer + stopword filter for Dutch dataset metadata.
pub struct DutchKeywordExtractor {
    /// Free-text tokens shorter than this (in characters) are dropped
    pub min_token_chars: usize,
    stopwords: HashSet<String>,
}

impl Default for DutchKeywordExtractor {
    fn default() -> Self {
        let mut stopwords: HashSet<String> = get(LANGUAGE::Dutch).into_iter().collect();
        stopwords.extend(CORE_STOPWORDS.iter().map(|w| w.to_string()));

        Self {
            min_token_chars: 3,
            stopwords,
        }
    }
}

impl DutchKeywordExtractor {
    /// Extractor with an explicit stopword list instead of the bundled one.
    pub fn with_stopwords<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_token_chars: 3,
            stopwords: stopwords
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Lowercased free-text tokens that survive the length and stopword filter.
    fn free_text_tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .filter(move |token| {
                token.chars().count() >= self.min_token_chars && !self.is_stopword(token)
            })
    }
}

impl KeywordExtractor for DutchKeywordExtractor {
    fn extract(&self, dataset: &Dataset) -> Vec<String> {
        let title = dataset.title.as_deref().unwrap_or("");
        let description = dataset.description.as_deref().unwrap_or("");

        let curated = dataset
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty());

        let mut seen = HashSet::new();
        let keywords: Vec<String> = self
            .free_text_tokens(title)
            .chain(self.free_text_tokens(description))
            .chain(curated)
            .filter(|k| seen.insert(k.clone()))
            .collect();

        debug!(
            dataset = %dataset.identifier,
            keywords = keywords.len(),
            "Extracted keywords"
        );

        keywords
    }
}
