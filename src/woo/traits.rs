// Keyword extractor trait: swap-ready abstraction.
//
// The analyzer only needs "dataset in, ordered unique terms out". The default
// implementation is a plain Dutch tokenizer with a stopword filter; a stemmer
// or a different language can be dropped in without touching the rest of
// the pipeline.

use crate::catalog::dataset::Dataset;

/// Derives candidate terms from a dataset's free text and curated keywords.
pub trait KeywordExtractor: Send + Sync {
    /// Ordered, deduplicated, lowercase terms. Never fails; may be empty.
    fn extract(&self, dataset: &Dataset) -> Vec<String>;
}
