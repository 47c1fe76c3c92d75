//! Scout CLI - find and rank files under a directory
//!
//! Usage:
//!   scout find <root> [query] [--filter fuzzy|contains|null] [--algorithm NAME]
//!              [--threshold T] [--limit N] [--select]
//!   scout list <root>
//!   scout config
//!
//! Every subcommand accepts `--config`, `--ignore-file`, `--hidden-ignore`
//! and `--workers`, which override the config file.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use scout_core::config::{self, FilterKind, FinderConfig};
use scout_core::{FuzzyAlgorithm, ScanSession, ScoredPath, Scanner};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Scout - Interactive Fuzzy File Finder", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    overrides: Overrides,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct Overrides {
    /// Config file (default: <config dir>/scout/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore file; enables ignore rules
    #[arg(long, global = true)]
    ignore_file: Option<PathBuf>,

    /// Skip dot-files and dot-directories (applies with ignore rules enabled)
    #[arg(long, global = true)]
    hidden_ignore: bool,

    /// Crawler threads (0 = one per CPU)
    #[arg(short, long, global = true)]
    workers: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory and rank its files against a query
    Find {
        /// Directory to scan
        root: PathBuf,

        /// Query text (empty shows everything)
        #[arg(default_value = "")]
        query: String,

        /// Filter type: fuzzy, contains or null
        #[arg(short, long)]
        filter: Option<FilterKind>,

        /// Fuzzy algorithm: jarowinkler, ngram or levenshtein
        #[arg(short, long)]
        algorithm: Option<FuzzyAlgorithm>,

        /// Fuzzy acceptance threshold in [0, 1]
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Number of results to print (0 = all)
        #[arg(short = 'n', long, default_value = "0")]
        limit: usize,

        /// Print only the best match
        #[arg(short, long)]
        select: bool,
    },

    /// Stream every file under a directory as it is discovered
    List {
        /// Directory to scan
        root: PathBuf,
    },

    /// Show config locations and the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, results to stdout
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut finder = load_config(&cli.overrides)?;

    match cli.command {
        Commands::Find {
            root,
            query,
            filter,
            algorithm,
            threshold,
            limit,
            select,
        } => {
            if let Some(kind) = filter {
                finder.filter.kind = kind;
            }
            if let Some(algorithm) = algorithm {
                finder.filter.algorithm = algorithm.name().to_string();
            }
            if let Some(threshold) = threshold {
                finder.filter.threshold = threshold;
            }
            finder.validate().context("Invalid filter settings")?;

            let limit = if select { 1 } else { limit };
            find(&root, &query, &finder, limit)
        }
        Commands::List { root } => list(&root, &finder),
        Commands::Config => show_config(&cli.overrides, &finder),
    }
}

fn load_config(overrides: &Overrides) -> Result<FinderConfig> {
    let mut finder = match &overrides.config {
        Some(path) => FinderConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match config::default_config_path() {
            Some(path) => FinderConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => FinderConfig::default(),
        },
    };

    if let Some(path) = &overrides.ignore_file {
        finder.ignore.enable = true;
        finder.ignore.file = Some(path.clone());
    }
    if overrides.hidden_ignore {
        finder.ignore.hidden_ignore = true;
    }
    if let Some(workers) = overrides.workers {
        finder.scan.workers = workers;
    }

    Ok(finder)
}

fn ensure_directory(root: &Path) -> Result<()> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    Ok(())
}

fn find(root: &Path, query: &str, finder: &FinderConfig, limit: usize) -> Result<()> {
    ensure_directory(root)?;

    let start = Instant::now();
    let mut session = ScanSession::start(root, finder).context("Failed to start scan")?;
    let stats = session.wait();

    tracing::info!(
        "Scanned {} files in {} directories ({} skipped) in {:.2}s",
        stats.files,
        stats.directories,
        stats.skipped,
        start.elapsed().as_secs_f64()
    );

    let results = session.query(query).context("Failed to apply query")?;
    if results.is_empty() {
        tracing::info!("No matches for {:?}", query);
    }

    let take = if limit == 0 { results.len() } else { limit };
    print_results(&results[..take.min(results.len())])
}

fn print_results(results: &[ScoredPath]) -> Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    for result in results {
        writeln!(out, "{:.3}  {}", result.score, result.path)?;
    }
    out.flush()?;
    Ok(())
}

fn list(root: &Path, finder: &FinderConfig) -> Result<()> {
    ensure_directory(root)?;

    let scan_config = finder.scan_config(root).context("Failed to load ignore rules")?;
    let mut handle = Scanner::new(scan_config)
        .start()
        .context("Failed to start scan")?;

    let mut out = BufWriter::new(io::stdout().lock());
    for path in handle.by_ref() {
        writeln!(out, "{}", path.display())?;
    }
    out.flush()?;

    let root = handle.root().to_path_buf();
    let stats = handle.join();
    tracing::debug!(
        "Listed {} files under {} in {} directories ({} skipped)",
        stats.files,
        root.display(),
        stats.directories,
        stats.skipped
    );
    Ok(())
}

fn show_config(overrides: &Overrides, finder: &FinderConfig) -> Result<()> {
    let dir = config::config_dir();
    let config_path = overrides
        .config
        .clone()
        .or_else(config::default_config_path);
    let ignore_path = finder
        .ignore
        .file
        .clone()
        .or_else(config::default_ignore_path);

    println!("Scout Configuration");
    println!("===================");
    println!();
    println!("Config dir:   {}", display_opt(dir.as_deref()));
    println!("Config file:  {}", display_opt(config_path.as_deref()));
    println!("Ignore file:  {}", display_opt(ignore_path.as_deref()));
    println!();
    println!("Filter:");
    println!("  Type:       {}", finder.filter.kind);
    println!("  Algorithm:  {}", finder.filter.algorithm);
    println!("  Threshold:  {}", finder.filter.threshold);
    println!();
    println!("Ignore:");
    println!("  Enabled:    {}", finder.ignore.enable);
    println!("  Hidden:     {}", finder.ignore.hidden_ignore);
    println!();
    println!("Scan:");
    println!("  Workers:    {}", finder.scan.workers);
    println!("  Work queue: {}", finder.scan.work_queue_capacity);
    println!("  Results:    {}", finder.scan.results_capacity);

    Ok(())
}

fn display_opt(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unavailable)".to_string())
}
