use std::fmt;
use std::path::MAIN_SEPARATOR;
use std::str::FromStr;

use super::metrics::{jaro_winkler, levenshtein_similarity, ngrams, overlap_coefficient, NGRAM_LEN};
use crate::config::{FilterConfig, FilterKind};
use crate::{Result, ScoutError};

/// Score given to paths accepted without similarity scoring
pub const UNSCORED: f64 = 1.0;

/// A path with its ranking score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPath {
    pub path: String,
    /// Higher ranks first. Usually in `[0, 1]`, but n-gram overlap counts
    /// repeated grams of the path and can go above 1, outranking an
    /// exact match.
    pub score: f64,
}

impl ScoredPath {
    pub fn new<S: Into<String>>(path: S, score: f64) -> Self {
        Self {
            path: path.into(),
            score,
        }
    }

    /// A freshly discovered path, before any query is applied
    pub fn unscored<S: Into<String>>(path: S) -> Self {
        Self::new(path, UNSCORED)
    }
}

impl AsRef<str> for ScoredPath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

/// Similarity algorithm used by the fuzzy filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuzzyAlgorithm {
    JaroWinkler,
    NGram,
    Levenshtein,
}

impl FuzzyAlgorithm {
    pub const ALL: [FuzzyAlgorithm; 3] = [
        FuzzyAlgorithm::JaroWinkler,
        FuzzyAlgorithm::NGram,
        FuzzyAlgorithm::Levenshtein,
    ];

    /// Configuration name of the algorithm
    pub fn name(&self) -> &'static str {
        match self {
            FuzzyAlgorithm::JaroWinkler => "jarowinkler",
            FuzzyAlgorithm::NGram => "ngram",
            FuzzyAlgorithm::Levenshtein => "levenshtein",
        }
    }
}

impl fmt::Display for FuzzyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FuzzyAlgorithm {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|algo| algo.name() == s)
            .ok_or_else(|| ScoutError::UnknownAlgorithm(s.to_string()))
    }
}

/// Fuzzy matcher for one query
#[derive(Debug, Clone)]
pub struct FuzzyFilter {
    pattern: String,
    algorithm: FuzzyAlgorithm,
    threshold: f64,
    pattern_ngrams: Vec<String>,
}

impl FuzzyFilter {
    pub fn new<S: Into<String>>(pattern: S, algorithm: FuzzyAlgorithm, threshold: f64) -> Self {
        let pattern = pattern.into();
        let pattern_ngrams = match algorithm {
            FuzzyAlgorithm::NGram => ngrams(&pattern, NGRAM_LEN),
            _ => Vec::new(),
        };

        Self {
            pattern,
            algorithm,
            threshold,
            pattern_ngrams,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn algorithm(&self) -> FuzzyAlgorithm {
        self.algorithm
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity between the query and a candidate path.
    ///
    /// N-gram overlap looks at the whole path, the other algorithms at the
    /// last path segment only.
    pub fn score(&self, path: &str) -> f64 {
        match self.algorithm {
            FuzzyAlgorithm::NGram => {
                overlap_coefficient(&ngrams(path, NGRAM_LEN), &self.pattern_ngrams)
            }
            FuzzyAlgorithm::JaroWinkler => jaro_winkler(basename(path), &self.pattern),
            FuzzyAlgorithm::Levenshtein => levenshtein_similarity(basename(path), &self.pattern),
        }
    }
}

/// How candidate paths are accepted and scored for one query
#[derive(Debug, Clone)]
pub enum MatchStrategy {
    /// Accept everything
    NoFilter,
    /// Accept byte-for-byte equal paths
    Exact(String),
    /// Accept paths containing the needle, ignoring case
    Contains(String),
    /// Accept paths scoring strictly above a threshold
    Fuzzy(FuzzyFilter),
}

impl MatchStrategy {
    pub fn exact<S: Into<String>>(pattern: S) -> Self {
        MatchStrategy::Exact(pattern.into())
    }

    pub fn contains(pattern: &str) -> Self {
        MatchStrategy::Contains(pattern.to_lowercase())
    }

    pub fn fuzzy<S: Into<String>>(pattern: S, algorithm: FuzzyAlgorithm, threshold: f64) -> Self {
        MatchStrategy::Fuzzy(FuzzyFilter::new(pattern, algorithm, threshold))
    }

    /// Build the strategy for the current query text.
    ///
    /// An empty query shows everything, whatever the configured filter.
    pub fn for_query(config: &FilterConfig, query: &str) -> Result<Self> {
        if query.is_empty() {
            return Ok(MatchStrategy::NoFilter);
        }

        let strategy = match config.kind {
            FilterKind::Null => MatchStrategy::NoFilter,
            FilterKind::Contains => MatchStrategy::contains(query),
            FilterKind::Fuzzy => {
                let algorithm: FuzzyAlgorithm = config.algorithm.parse()?;
                MatchStrategy::fuzzy(query, algorithm, config.threshold)
            }
        };

        Ok(strategy)
    }

    /// Score a path; `None` when the strategy rejects it
    pub fn evaluate(&self, path: &str) -> Option<ScoredPath> {
        match self {
            MatchStrategy::NoFilter => Some(ScoredPath::unscored(path)),
            MatchStrategy::Exact(pattern) => {
                (path == pattern.as_str()).then(|| ScoredPath::unscored(path))
            }
            MatchStrategy::Contains(needle) => path
                .to_lowercase()
                .contains(needle.as_str())
                .then(|| ScoredPath::unscored(path)),
            MatchStrategy::Fuzzy(filter) => {
                let score = filter.score(path);
                (score > filter.threshold).then(|| ScoredPath::new(path, score))
            }
        }
    }
}

/// Last path segment, splitting on `/` and the platform separator
fn basename(path: &str) -> &str {
    path.rsplit(['/', MAIN_SEPARATOR]).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts(strategy: &MatchStrategy, path: &str) -> bool {
        strategy.evaluate(path).is_some()
    }

    #[test]
    fn test_no_filter_accepts_everything() {
        let strategy = MatchStrategy::NoFilter;
        assert_eq!(strategy.evaluate(""), Some(ScoredPath::unscored("")));
        assert_eq!(
            strategy.evaluate("a/b/c.txt"),
            Some(ScoredPath::new("a/b/c.txt", 1.0))
        );
    }

    #[test]
    fn test_exact_filter() {
        assert!(accepts(&MatchStrategy::exact("README.md"), "README.md"));
        assert!(!accepts(&MatchStrategy::exact("main.go"), "internal/main.go"));
        assert!(!accepts(&MatchStrategy::exact("README"), "README.md"));
        assert!(!accepts(&MatchStrategy::exact("readme.md"), "README.md"));
        assert!(accepts(&MatchStrategy::exact(""), ""));
    }

    #[test]
    fn test_contains_filter() {
        assert!(accepts(&MatchStrategy::contains("test"), "/home/user/project/main_test.go"));
        assert!(!accepts(&MatchStrategy::contains("docs"), "/home/user/project/main.go"));
        assert!(accepts(&MatchStrategy::contains("readme"), "/home/user/project/README.md"));
        assert!(accepts(&MatchStrategy::contains("README"), "/home/user/project/readme.md"));
        assert!(accepts(&MatchStrategy::contains(""), "whatever/path"));
        assert!(!accepts(&MatchStrategy::contains("test"), ""));
    }

    #[test]
    fn test_contains_score_is_fixed() {
        let scored = MatchStrategy::contains("main").evaluate("src/main.rs").unwrap();
        assert_eq!(scored.score, UNSCORED);
    }

    #[test]
    fn test_fuzzy_jaro_winkler_uses_basename() {
        let strategy = MatchStrategy::fuzzy("jtfnd", FuzzyAlgorithm::JaroWinkler, 0.8);
        assert!(accepts(&strategy, "/home/user/jetfind"));

        let strategy = MatchStrategy::fuzzy("kyusydus", FuzzyAlgorithm::JaroWinkler, 0.8);
        assert!(!accepts(&strategy, "/home/user/jetfind/main_test.go"));
    }

    #[test]
    fn test_fuzzy_levenshtein_uses_basename() {
        let strategy = MatchStrategy::fuzzy("gills", FuzzyAlgorithm::Levenshtein, 0.5);
        let scored = strategy.evaluate("deep/dir/bill").unwrap();
        assert!((scored.score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_ngram_uses_full_path() {
        let filter = FuzzyFilter::new("src/ma", FuzzyAlgorithm::NGram, 0.5);
        // pattern grams: sr rc c/ /m ma, all present in the full path
        assert_eq!(filter.score("src/main.rs"), 1.0);
        assert_eq!(filter.score("lib/other.rs"), 0.0);
    }

    #[test]
    fn test_fuzzy_ngram_score_can_exceed_one() {
        let strategy = MatchStrategy::fuzzy("ab", FuzzyAlgorithm::NGram, 0.5);
        // ab ba ab ba ab: three grams hit a one-gram pattern
        let scored = strategy.evaluate("x/ababab").unwrap();
        assert_eq!(scored.score, 3.0);

        let exact = strategy.evaluate("ab").unwrap();
        assert!(scored.score > exact.score);
    }

    #[test]
    fn test_fuzzy_threshold_is_strict() {
        let strategy = MatchStrategy::fuzzy("table", FuzzyAlgorithm::Levenshtein, 1.0);
        assert!(!accepts(&strategy, "table"));

        let strategy = MatchStrategy::fuzzy("table", FuzzyAlgorithm::Levenshtein, 0.99);
        assert!(accepts(&strategy, "dir/table"));
    }

    #[test]
    fn test_algorithm_names_round_trip() {
        for algo in FuzzyAlgorithm::ALL {
            assert_eq!(algo.name().parse::<FuzzyAlgorithm>().unwrap(), algo);
            assert_eq!(algo.to_string(), algo.name());
        }
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let err = "soundex".parse::<FuzzyAlgorithm>().unwrap_err();
        assert!(matches!(err, ScoutError::UnknownAlgorithm(ref name) if name == "soundex"));
    }

    #[test]
    fn test_for_query_selects_strategy() {
        let mut config = FilterConfig::default();

        assert!(matches!(
            MatchStrategy::for_query(&config, "").unwrap(),
            MatchStrategy::NoFilter
        ));
        assert!(matches!(
            MatchStrategy::for_query(&config, "main").unwrap(),
            MatchStrategy::Fuzzy(ref f) if f.algorithm() == FuzzyAlgorithm::JaroWinkler
        ));

        config.kind = FilterKind::Contains;
        assert!(matches!(
            MatchStrategy::for_query(&config, "Main").unwrap(),
            MatchStrategy::Contains(ref needle) if needle == "main"
        ));

        config.kind = FilterKind::Null;
        assert!(matches!(
            MatchStrategy::for_query(&config, "main").unwrap(),
            MatchStrategy::NoFilter
        ));
    }

    #[test]
    fn test_for_query_unknown_algorithm_is_fatal() {
        let config = FilterConfig {
            algorithm: "soundex".to_string(),
            ..FilterConfig::default()
        };
        assert!(matches!(
            MatchStrategy::for_query(&config, "main"),
            Err(ScoutError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("a/b/c.txt"), "c.txt");
        assert_eq!(basename("c.txt"), "c.txt");
        assert_eq!(basename("a/b/"), "");
    }
}
