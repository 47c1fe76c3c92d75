//! Interactive scan session
//!
//! Owns a running crawl and the snapshot of every path it has delivered so
//! far. Queries are answered against the current snapshot, so results can be
//! shown while the crawl is still going.

use std::path::{Path, PathBuf};

use crate::config::{FilterConfig, FinderConfig};
use crate::filter::{FilterEngine, MatchStrategy, ScoredPath};
use crate::scanner::{ScanHandle, ScanStats, Scanner};
use crate::Result;

pub struct ScanSession {
    root: PathBuf,
    filter: FilterConfig,
    engine: FilterEngine,
    handle: Option<ScanHandle>,
    snapshot: Vec<ScoredPath>,
    stats: ScanStats,
    pending: Vec<PathBuf>,
}

impl ScanSession {
    /// Start crawling `root` with the scan, ignore and filter settings of `config`
    pub fn start<P: Into<PathBuf>>(root: P, config: &FinderConfig) -> Result<Self> {
        config.validate()?;

        let root = root.into();
        let scan_config = config.scan_config(root.clone())?;
        let handle = Scanner::new(scan_config).start()?;

        tracing::debug!("Session started for {:?}", root);

        Ok(Self {
            root,
            filter: config.filter.clone(),
            engine: FilterEngine::default(),
            handle: Some(handle),
            snapshot: Vec::new(),
            stats: ScanStats::default(),
            pending: Vec::new(),
        })
    }

    /// Replace the engine used by [`ScanSession::query`]
    pub fn with_engine(mut self, engine: FilterEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Move every path delivered so far into the snapshot without blocking.
    ///
    /// Returns `true` once the crawl has finished.
    pub fn poll(&mut self) -> bool {
        let Some(handle) = self.handle.as_ref() else {
            return true;
        };

        let finished = handle.drain_into(&mut self.pending);
        self.absorb_pending();

        if finished {
            if let Some(handle) = self.handle.take() {
                self.stats = handle.join();
            }
        }
        finished
    }

    /// Block until the crawl has finished and every path is in the snapshot
    pub fn wait(&mut self) -> ScanStats {
        if let Some(mut handle) = self.handle.take() {
            self.pending.extend(handle.by_ref());
            self.absorb_pending();
            self.stats = handle.join();
        }
        self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_none()
    }

    /// Crawl totals; final once the session is finished
    pub fn stats(&self) -> ScanStats {
        match &self.handle {
            Some(handle) => handle.stats(),
            None => self.stats,
        }
    }

    /// Every path delivered so far, each with score 1.0
    pub fn snapshot(&self) -> &[ScoredPath] {
        &self.snapshot
    }

    /// Rank the current snapshot against `text`
    pub fn query(&self, text: &str) -> Result<Vec<ScoredPath>> {
        let strategy = MatchStrategy::for_query(&self.filter, text)?;
        Ok(self.engine.apply(&self.snapshot, &strategy))
    }

    fn absorb_pending(&mut self) {
        self.snapshot.extend(
            self.pending
                .drain(..)
                .map(|path| ScoredPath::unscored(path.to_string_lossy().into_owned())),
        );
    }
}
