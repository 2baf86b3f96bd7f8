// Woo-koppeling: links open-data datasets to Woo information categories
//
// This is the library root. `woo` holds the offline analysis pipeline,
// `catalog` the HTTP clients that fetch datasets to feed it.

pub mod catalog;
pub mod config;
pub mod error;
pub mod output;
pub mod woo;
