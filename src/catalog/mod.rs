// Open-data catalog clients and the normalized dataset record.
//
// Two sources feed the analyzer: the municipal DCAT API and the national
// CKAN portal. Both normalize into the same `Dataset`.

pub mod ckan;
pub mod dataset;
pub mod dcat;
pub mod traits;

pub use dataset::Dataset;
pub use traits::DatasetSource;
