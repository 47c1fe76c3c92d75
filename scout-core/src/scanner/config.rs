use std::path::PathBuf;
use std::sync::Arc;

use super::ignore::IgnoreSet;

/// Default capacity of the pending-directory queue
pub const DEFAULT_WORK_QUEUE_CAPACITY: usize = 512;

/// Default capacity of the discovered-file queue
pub const DEFAULT_RESULTS_CAPACITY: usize = 1024;

/// Configuration for one crawl
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory the crawl starts from
    pub root: PathBuf,
    /// Worker thread count (0 = one per CPU)
    pub workers: usize,
    /// Exclusion rules; `None` disables exclusion entirely
    pub ignore: Option<Arc<IgnoreSet>>,
    /// Bound of the directory work queue
    pub work_queue_capacity: usize,
    /// Bound of the results queue
    pub results_capacity: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            workers: 0,
            ignore: None,
            work_queue_capacity: DEFAULT_WORK_QUEUE_CAPACITY,
            results_capacity: DEFAULT_RESULTS_CAPACITY,
        }
    }
}

impl ScanConfig {
    /// Create a ScanConfig for a root with default settings
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Attach an ignore set
    pub fn with_ignore(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = Some(Arc::new(ignore));
        self
    }

    /// Set both queue bounds
    pub fn with_capacities(mut self, work_queue: usize, results: usize) -> Self {
        self.work_queue_capacity = work_queue;
        self.results_capacity = results;
        self
    }

    /// Worker count with the CPU default resolved
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.workers, 0);
        assert!(config.ignore.is_none());
        assert_eq!(config.work_queue_capacity, 512);
        assert_eq!(config.results_capacity, 1024);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ScanConfig::new("/tmp/project")
            .with_workers(3)
            .with_ignore(IgnoreSet::new(true))
            .with_capacities(4, 8);

        assert_eq!(config.root, PathBuf::from("/tmp/project"));
        assert_eq!(config.effective_workers(), 3);
        assert!(config.ignore.as_ref().is_some_and(|set| set.ignores_hidden()));
        assert_eq!(config.work_queue_capacity, 4);
        assert_eq!(config.results_capacity, 8);
    }

    #[test]
    fn test_effective_workers_defaults_to_cpus() {
        assert!(ScanConfig::default().effective_workers() >= 1);
    }
}
