//! Pipeline stages for a single crawl-and-publish run.
//!
//! A run is one linear pass: fetch search hits, resolve redirected
//! timestamps, classify into canonical entries, build the aggregation
//! indexes, and export. No state survives between runs.

pub mod classify;
pub mod index;
mod run;

pub use classify::{Classifier, Dropped};
pub use index::{ScopeIndex, build_indexes, entries_for_author, entries_for_category};
pub use run::run_pipeline;
