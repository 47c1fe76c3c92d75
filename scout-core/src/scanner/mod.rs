//! Scanner Module for Scout
//!
//! Provides the file discovery side of the pipeline:
//! - Parallel directory crawling with bounded work and result queues
//! - Symlink cycle detection through canonical paths
//! - Layered, negatable ignore rules

mod config;
mod ignore;
mod walker;

pub use config::{ScanConfig, DEFAULT_RESULTS_CAPACITY, DEFAULT_WORK_QUEUE_CAPACITY};
pub use ignore::{glob_to_regex, IgnoreRule, IgnoreSet, IGNORE_FILE_NAME};
pub use walker::{ScanHandle, ScanStats, Scanner};
