//! Filter Module for Scout
//!
//! Ranks a snapshot of discovered paths against the current query:
//! - Similarity metrics (Jaro-Winkler, Levenshtein, n-gram overlap)
//! - Match strategies (none, exact, contains, fuzzy)
//! - Sequential or chunked parallel application with a final sort

mod engine;
pub mod metrics;
mod strategy;

pub use engine::{apply, FilterEngine, PARALLEL_THRESHOLD};
pub use strategy::{FuzzyAlgorithm, FuzzyFilter, MatchStrategy, ScoredPath, UNSCORED};
