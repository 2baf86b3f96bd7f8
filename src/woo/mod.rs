// Woo-connection analysis: dataset text to keywords, topics and the Woo
// information categories a requester would search for related documents.
//
// Pipeline: KeywordExtractor -> TopicMapper -> CategoryMatcher -> report.
// The taxonomy tables are plain data so they can be replaced from a file.

pub mod categories;
pub mod keywords;
pub mod report;
pub mod taxonomy;
pub mod topics;
pub mod traits;

pub use categories::{CategoryMatch, CategoryMatcher};
pub use keywords::DutchKeywordExtractor;
pub use report::{AnalysisResult, RelatedDataset, WooAnalyzer, WooReport};
pub use taxonomy::{WooCategory, WooTables};
pub use topics::TopicMapper;
