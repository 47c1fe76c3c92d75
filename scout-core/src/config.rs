//! Finder configuration
//!
//! Loaded from `<config dir>/scout/config.toml`:
//!
//! ```toml
//! [filter]
//! type = "fuzzy"            # fuzzy | contains | null
//! algorithm = "jarowinkler" # jarowinkler | ngram | levenshtein
//! threshold = 0.9
//!
//! [ignore]
//! enable = true
//! hidden_ignore = true
//!
//! [scan]
//! workers = 0               # 0 = one per CPU
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::filter::FuzzyAlgorithm;
use crate::scanner::{
    IgnoreSet, ScanConfig, DEFAULT_RESULTS_CAPACITY, DEFAULT_WORK_QUEUE_CAPACITY,
    IGNORE_FILE_NAME,
};
use crate::{Result, ScoutError};

/// Application directory name under the platform config dir
pub const APP_NAME: &str = "scout";

/// Config file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Which filter turns a query into a match strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    Fuzzy,
    Contains,
    /// Legacy: show everything regardless of the query
    Null,
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Fuzzy => "fuzzy",
            FilterKind::Contains => "contains",
            FilterKind::Null => "null",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fuzzy" => Ok(FilterKind::Fuzzy),
            "contains" => Ok(FilterKind::Contains),
            "null" => Ok(FilterKind::Null),
            other => Err(ScoutError::UnknownFilterType(other.to_string())),
        }
    }
}

/// Query filtering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    #[serde(rename = "type")]
    pub kind: FilterKind,
    /// Fuzzy algorithm name
    pub algorithm: String,
    /// Fuzzy acceptance threshold (exclusive)
    pub threshold: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: FilterKind::Fuzzy,
            algorithm: FuzzyAlgorithm::JaroWinkler.name().to_string(),
            threshold: 0.9,
        }
    }
}

/// Ignore-file settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Apply the rules of the ignore file
    pub enable: bool,
    /// Exclude dot-files and dot-directories while ignore rules are enabled
    pub hidden_ignore: bool,
    /// Ignore file location; defaults to `<config dir>/scout/.scoutignore`
    pub file: Option<PathBuf>,
}

impl IgnoreConfig {
    /// Build the ignore set these settings describe.
    ///
    /// Disabled settings yield `None`, which excludes nothing; `hidden_ignore`
    /// only takes effect together with `enable`.
    pub fn build(&self) -> Result<Option<IgnoreSet>> {
        if !self.enable {
            return Ok(None);
        }

        let path = match &self.file {
            Some(path) => path.clone(),
            None => default_ignore_path()
                .ok_or_else(|| ScoutError::Config("cannot locate the config directory".into()))?,
        };

        tracing::debug!("Loading ignore rules from {:?}", path);
        IgnoreSet::from_file(&path, self.hidden_ignore).map(Some)
    }
}

/// Crawler sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Worker threads (0 = one per CPU)
    pub workers: usize,
    pub work_queue_capacity: usize,
    pub results_capacity: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            workers: 0,
            work_queue_capacity: DEFAULT_WORK_QUEUE_CAPACITY,
            results_capacity: DEFAULT_RESULTS_CAPACITY,
        }
    }
}

/// Complete finder configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub filter: FilterConfig,
    pub ignore: IgnoreConfig,
    pub scan: ScanSettings,
}

impl FinderConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: FinderConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Like [`FinderConfig::load`], but a missing file yields the defaults.
    ///
    /// A file that exists and is invalid is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Check the filter settings
    pub fn validate(&self) -> Result<()> {
        if self.filter.kind == FilterKind::Fuzzy {
            self.filter.algorithm.parse::<FuzzyAlgorithm>()?;

            if !(0.0..=1.0).contains(&self.filter.threshold) {
                return Err(ScoutError::InvalidThreshold(self.filter.threshold));
            }
        }
        Ok(())
    }

    /// Scan configuration for a root, with the ignore set built
    pub fn scan_config<P: Into<PathBuf>>(&self, root: P) -> Result<ScanConfig> {
        let mut config = ScanConfig::new(root)
            .with_workers(self.scan.workers)
            .with_capacities(self.scan.work_queue_capacity, self.scan.results_capacity);

        if let Some(ignore) = self.ignore.build()? {
            config = config.with_ignore(ignore);
        }
        Ok(config)
    }
}

/// `<platform config dir>/scout`
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Default ignore file location
pub fn default_ignore_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(IGNORE_FILE_NAME))
}
