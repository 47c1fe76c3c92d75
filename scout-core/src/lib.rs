//! Scout - Interactive Fuzzy File Finder
//!
//! Crawls a directory tree in parallel, skipping paths matched by
//! gitignore-style rules, and ranks the discovered paths against a query
//! while the crawl is still running.

pub mod config;
pub mod error;
pub mod filter;
pub mod scanner;
pub mod session;

pub use config::{FilterConfig, FilterKind, FinderConfig, IgnoreConfig, ScanSettings};
pub use error::{Result, ScoutError};
pub use filter::{FilterEngine, FuzzyAlgorithm, MatchStrategy, ScoredPath};
pub use scanner::{IgnoreSet, ScanConfig, ScanHandle, ScanStats, Scanner};
pub use session::ScanSession;

/// Scout Version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
