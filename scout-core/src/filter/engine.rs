use rayon::prelude::*;

use super::strategy::{MatchStrategy, ScoredPath};

/// Inputs smaller than this are filtered on the calling thread
pub const PARALLEL_THRESHOLD: usize = 100;

/// Chunking kicks in once the input exceeds this many paths per worker
const MIN_PATHS_PER_WORKER: usize = 10;

/// Applies a match strategy to a snapshot of paths and ranks the matches
#[derive(Debug, Clone)]
pub struct FilterEngine {
    workers: usize,
    parallel_threshold: usize,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self {
            workers: rayon::current_num_threads().max(1),
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks the parallel path splits its input into
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Input size from which the parallel path is taken
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Filter `paths` with `strategy`, sorted by descending score.
    ///
    /// Equal scores come back in no particular order.
    pub fn apply<P>(&self, paths: &[P], strategy: &MatchStrategy) -> Vec<ScoredPath>
    where
        P: AsRef<str> + Sync,
    {
        if paths.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<ScoredPath> = if paths.len() < self.parallel_threshold {
            paths
                .iter()
                .filter_map(|p| strategy.evaluate(p.as_ref()))
                .collect()
        } else {
            let chunk_len = self.chunk_len(paths.len());
            paths
                .par_chunks(chunk_len)
                .flat_map_iter(|chunk| chunk.iter().filter_map(|p| strategy.evaluate(p.as_ref())))
                .collect()
        };

        matches.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!("Filtered {} of {} paths", matches.len(), paths.len());
        matches
    }

    /// Contiguous chunk length for the parallel path.
    ///
    /// One chunk per worker (plus the remainder) once the input exceeds ten
    /// paths per worker, a single chunk otherwise.
    fn chunk_len(&self, len: usize) -> usize {
        if len > self.workers * MIN_PATHS_PER_WORKER {
            (len / self.workers).max(1)
        } else {
            len.max(1)
        }
    }
}

/// Filter with the default engine
pub fn apply<P>(paths: &[P], strategy: &MatchStrategy) -> Vec<ScoredPath>
where
    P: AsRef<str> + Sync,
{
    FilterEngine::default().apply(paths, strategy)
}
