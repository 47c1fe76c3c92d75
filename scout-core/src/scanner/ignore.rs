use std::path::{Path, MAIN_SEPARATOR};

use regex::Regex;

use crate::{Result, ScoutError};

/// Default name of the ignore file inside the config directory
pub const IGNORE_FILE_NAME: &str = ".scoutignore";

/// Characters escaped literally when a glob is translated to a regex
const REGEX_META: &[char] = &['.', '\\', '+', '(', ')', '[', ']', '{', '}', '^', '$', '|'];

/// One compiled line of an ignore file
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// Pattern as written, without the `!` prefix and trailing `/`
    pattern: String,
    matcher: Regex,
    negated: bool,
    directory_only: bool,
}

impl IgnoreRule {
    /// Compile one ignore-file line.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (negated, line) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let (directory_only, pattern) = match line.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let mut expr = glob_to_regex(pattern);
        if directory_only {
            expr.push_str("/.*");
        }
        expr.push('$');

        let matcher = Regex::new(&expr).map_err(|source| ScoutError::InvalidGlob {
            pattern: line.to_string(),
            source,
        })?;

        Ok(Some(Self {
            pattern: pattern.to_string(),
            matcher,
            negated,
            directory_only,
        }))
    }

    /// Whether the path ends with something this rule's pattern describes
    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_directory_only(&self) -> bool {
        self.directory_only
    }
}

/// Translate a glob into an unanchored regex body.
///
/// `*` matches any run of non-separator characters, regex metacharacters are
/// escaped and everything else passes through unchanged. No `$` is appended.
pub fn glob_to_regex(glob: &str) -> String {
    let mut expr = String::with_capacity(glob.len() * 2);

    for c in glob.chars() {
        match c {
            '*' => expr.push_str("[^/]*"),
            c if REGEX_META.contains(&c) => {
                expr.push('\\');
                expr.push(c);
            }
            c => expr.push(c),
        }
    }

    expr
}

/// Ordered ignore rules plus the hidden-file switch.
///
/// Immutable once built, so scanner workers share it without locking.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    rules: Vec<IgnoreRule>,
    ignore_hidden: bool,
}

impl IgnoreSet {
    /// An empty rule set that only applies the hidden-file switch
    pub fn new(ignore_hidden: bool) -> Self {
        Self {
            rules: Vec::new(),
            ignore_hidden,
        }
    }

    /// Build a rule set from the contents of an ignore file
    pub fn parse(contents: &str, ignore_hidden: bool) -> Result<Self> {
        let mut rules = Vec::new();
        for line in contents.lines() {
            if let Some(rule) = IgnoreRule::parse(line)? {
                rules.push(rule);
            }
        }

        tracing::debug!("Compiled {} ignore rules", rules.len());

        Ok(Self {
            rules,
            ignore_hidden,
        })
    }

    /// Read and compile an ignore file
    pub fn from_file<P: AsRef<Path>>(path: P, ignore_hidden: bool) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&contents, ignore_hidden)
    }

    /// Check if a path (relative to the scan root) should be excluded.
    ///
    /// The last matching rule decides; a negated last match keeps the path.
    pub fn should_ignore(&self, path: &str) -> bool {
        if self.ignore_hidden && is_hidden_path(path) {
            return true;
        }

        match self.rules.iter().rposition(|rule| rule.is_match(path)) {
            Some(idx) => !self.rules[idx].is_negated(),
            None => false,
        }
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn ignores_hidden(&self) -> bool {
        self.ignore_hidden
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Check if any component is a dot-name longer than one character
fn is_hidden_path(path: &str) -> bool {
    path.split(['/', MAIN_SEPARATOR])
        .any(|component| component.len() > 1 && component.starts_with('.'))
}
