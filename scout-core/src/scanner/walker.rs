//! Concurrent directory crawler
//!
//! ```text
//!            ┌──────────── work queue (bounded) ◄───────────┐
//!            ▼                                               │ subdirectories
//! worker 0..N: canonicalize → visited? → read_dir → ignore? ─┤
//!                                                            │ files
//!            results queue (bounded) ◄───────────────────────┘
//!                 │
//!                 ▼
//!            ScanHandle (consumer)
//! ```
//!
//! Two completion signals are tracked separately. The pending-task counter
//! covers every directory that is queued or being expanded; when it returns to
//! zero no more work can appear and the done signal is raised. Workers leave
//! their pull loop on that signal, and once the last one exits the queues
//! are disconnected, which ends the consumer's iteration.
//!
//! A worker whose `try_send` finds the work queue full keeps the directory in
//! its own unbounded backlog, so expansion never blocks on a full work queue.
//! Only the results queue applies backpressure.
//!
//! Symlinked directories are followed and each canonical directory is
//! expanded once, which stops cycles. When one directory is reachable under
//! several logical paths, whichever path wins the race is the one expanded,
//! and ignore rules see that logical path. A rule naming one alias (say
//! `real/secret.txt`) does not apply to files reached through another.

use std::fs;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, Receiver, Sender, TryRecvError};
use dashmap::DashSet;

use super::config::ScanConfig;
use super::ignore::IgnoreSet;
use crate::{Result, ScoutError};

/// Totals for one crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Paths pushed to the results queue
    pub files: usize,
    /// Directories listed
    pub directories: usize,
    /// Entries or branches abandoned because of filesystem errors
    pub skipped: usize,
}

#[derive(Debug, Default)]
struct ScanCounters {
    files: AtomicUsize,
    directories: AtomicUsize,
    skipped: AtomicUsize,
}

impl ScanCounters {
    fn snapshot(&self) -> ScanStats {
        ScanStats {
            files: self.files.load(Ordering::Acquire),
            directories: self.directories.load(Ordering::Acquire),
            skipped: self.skipped.load(Ordering::Acquire),
        }
    }
}

/// Parallel file crawler
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    /// Create a scanner for a configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Spawn the workers and return a handle streaming discovered files.
    ///
    /// Paths arrive unordered and joined onto the configured root.
    pub fn start(self) -> Result<ScanHandle> {
        let workers = self.config.effective_workers();
        let root = self.config.root;

        tracing::debug!("Scanning {:?} with {} workers", root, workers);

        let (work_tx, work_rx) = bounded::<PathBuf>(self.config.work_queue_capacity);
        let (results_tx, results_rx) = bounded::<PathBuf>(self.config.results_capacity);
        let (done_tx, done_rx) = bounded::<()>(0);
        let counters = Arc::new(ScanCounters::default());

        let crawl = Arc::new(Crawl {
            root: root.clone(),
            ignore: self.config.ignore,
            visited: DashSet::new(),
            // The root is the first pending task.
            pending: AtomicUsize::new(1),
            work_tx,
            results_tx,
            done_tx: Mutex::new(Some(done_tx)),
            consumer_gone: AtomicBool::new(false),
            counters: Arc::clone(&counters),
        });

        let mut handles = Vec::with_capacity(workers);
        for worker_idx in 0..workers {
            let crawl = Arc::clone(&crawl);
            let work_rx = work_rx.clone();
            let done_rx = done_rx.clone();
            let seed = if worker_idx == 0 {
                vec![root.clone()]
            } else {
                Vec::new()
            };

            let handle = thread::Builder::new()
                .name(format!("scout-scan-{worker_idx}"))
                .spawn(move || crawl.run_worker(&work_rx, &done_rx, seed))
                .map_err(|e| ScoutError::ScanSpawn(e.to_string()))?;
            handles.push(handle);
        }

        Ok(ScanHandle {
            root,
            results: results_rx,
            workers: handles,
            counters,
        })
    }
}

/// State shared by the workers of one crawl
struct Crawl {
    root: PathBuf,
    ignore: Option<Arc<IgnoreSet>>,
    /// Canonical directories already expanded
    visited: DashSet<PathBuf>,
    /// Directories queued or being expanded
    pending: AtomicUsize,
    work_tx: Sender<PathBuf>,
    results_tx: Sender<PathBuf>,
    /// Dropped when `pending` reaches zero
    done_tx: Mutex<Option<Sender<()>>>,
    consumer_gone: AtomicBool,
    counters: Arc<ScanCounters>,
}

impl Crawl {
    fn run_worker(&self, work_rx: &Receiver<PathBuf>, done_rx: &Receiver<()>, seed: Vec<PathBuf>) {
        // Directories that did not fit in the work queue stay with this worker.
        let mut backlog = seed;

        loop {
            if let Some(dir) = backlog.pop() {
                self.expand(&dir, &mut backlog);
                continue;
            }

            select! {
                recv(work_rx) -> msg => match msg {
                    Ok(dir) => self.expand(&dir, &mut backlog),
                    Err(_) => break,
                },
                recv(done_rx) -> _ => break,
            }
        }
    }

    fn expand(&self, dir: &Path, backlog: &mut Vec<PathBuf>) {
        self.visit(dir, backlog);
        self.finish_task();
    }

    fn visit(&self, dir: &Path, backlog: &mut Vec<PathBuf>) {
        if self.consumer_gone.load(Ordering::Relaxed) {
            return;
        }

        let canonical = match fs::canonicalize(dir) {
            Ok(path) => path,
            Err(err) => {
                tracing::trace!("Skipping {:?}: {}", dir, err);
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        if !self.visited.insert(canonical) {
            tracing::trace!("Already expanded {:?}", dir);
            return;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::trace!("Cannot list {:?}: {}", dir, err);
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        self.counters.directories.fetch_add(1, Ordering::Relaxed);

        for entry in entries {
            let Ok(entry) = entry else {
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            };
            let path = entry.path();

            if let Some(ignore) = &self.ignore {
                if ignore.should_ignore(&self.relative(&path)) {
                    continue;
                }
            }

            let is_dir = match entry.file_type() {
                Ok(ft) if ft.is_symlink() => match fs::metadata(&path) {
                    Ok(meta) => meta.is_dir(),
                    Err(err) => {
                        tracing::trace!("Broken link {:?}: {}", path, err);
                        self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                        continue;
                    }
                },
                Ok(ft) => ft.is_dir(),
                Err(_) => {
                    self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            };

            if is_dir {
                self.enqueue(path, backlog);
            } else if self.results_tx.send(path).is_ok() {
                self.counters.files.fetch_add(1, Ordering::Relaxed);
            } else {
                self.consumer_gone.store(true, Ordering::Relaxed);
                return;
            }
        }
    }

    fn enqueue(&self, dir: PathBuf, backlog: &mut Vec<PathBuf>) {
        // Count before publishing so `pending` never drops to zero while
        // this directory is in flight.
        self.pending.fetch_add(1, Ordering::AcqRel);

        if let Err(err) = self.work_tx.try_send(dir) {
            backlog.push(err.into_inner());
        }
    }

    fn finish_task(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) != 1 {
            return;
        }

        let stats = self.counters.snapshot();
        tracing::debug!(
            "Scan of {:?} finished: {} files, {} directories, {} skipped",
            self.root,
            stats.files,
            stats.directories,
            stats.skipped
        );

        self.done_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Path relative to the root with `/` separators, as the ignore rules expect
    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Consumer side of a running crawl.
///
/// Iterating blocks for the next path and ends once the crawl is exhausted.
pub struct ScanHandle {
    root: PathBuf,
    results: Receiver<PathBuf>,
    workers: Vec<JoinHandle<()>>,
    counters: Arc<ScanCounters>,
}

impl ScanHandle {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Move every path available right now into `out` without blocking.
    ///
    /// Returns `true` once the crawl is finished and fully drained.
    pub fn drain_into(&self, out: &mut Vec<PathBuf>) -> bool {
        loop {
            match self.results.try_recv() {
                Ok(path) => out.push(path),
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => return true,
            }
        }
    }

    /// Totals so far
    pub fn stats(&self) -> ScanStats {
        self.counters.snapshot()
    }

    /// Discard undelivered paths, wait for every worker and return the totals.
    ///
    /// A panicking worker is re-raised here.
    pub fn join(self) -> ScanStats {
        let ScanHandle {
            results,
            workers,
            counters,
            ..
        } = self;
        drop(results);

        for worker in workers {
            if let Err(payload) = worker.join() {
                panic::resume_unwind(payload);
            }
        }

        counters.snapshot()
    }
}

impl Iterator for ScanHandle {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        self.results.recv().ok()
    }
}
