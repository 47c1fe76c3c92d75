//! String similarity metrics used by the fuzzy filter
//!
//! Every function here is pure; higher scores mean more similar. Jaro-Winkler
//! and the Levenshtein ratio stay in `[0, 1]`. The overlap coefficient counts
//! repeated subject n-grams and can exceed 1.

use std::collections::HashSet;

/// Default n-gram length used by the fuzzy filter
pub const NGRAM_LEN: usize = 2;

/// Maximum common prefix length rewarded by the Winkler bonus
const WINKLER_PREFIX_MAX: usize = 4;

/// Winkler prefix scaling factor
const WINKLER_SCALING: f64 = 0.1;

/// Split a string into contiguous character n-grams.
///
/// A string no longer than `n` characters is a single n-gram equal to itself.
pub fn ngrams(s: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= n {
        return vec![s.to_string()];
    }

    chars.windows(n).map(|w| w.iter().collect()).collect()
}

/// Overlap coefficient between two n-gram sequences.
///
/// Counts how many of the subject's n-grams (with repetition) appear in the
/// pattern's n-gram set, divided by the length of the shorter sequence.
pub fn overlap_coefficient<S: AsRef<str>>(subject: &[S], pattern: &[S]) -> f64 {
    let smaller = subject.len().min(pattern.len());
    if smaller == 0 {
        return 0.0;
    }

    let set: HashSet<&str> = pattern.iter().map(|p| p.as_ref()).collect();
    let shared = subject
        .iter()
        .filter(|gram| {
            let gram: &str = gram.as_ref();
            set.contains(gram)
        })
        .count();

    shared as f64 / smaller as f64
}

/// Case-insensitive Jaro-Winkler similarity
pub fn jaro_winkler(s1: &str, s2: &str) -> f64 {
    if s1.is_empty() || s2.is_empty() {
        return 0.0;
    }

    let s1: Vec<char> = s1.to_lowercase().chars().collect();
    let s2: Vec<char> = s2.to_lowercase().chars().collect();

    if s1 == s2 {
        return 1.0;
    }

    let (len1, len2) = (s1.len(), s2.len());
    let window = (len1.max(len2) / 2).saturating_sub(1);

    let mut s1_matched = vec![false; len1];
    let mut s2_matched = vec![false; len2];
    let mut matches = 0usize;

    for i in 0..len1 {
        let start = i.saturating_sub(window);
        let end = (i + window).min(len2 - 1);

        for j in start..=end {
            if !s2_matched[j] && s1[i] == s2[j] {
                s1_matched[i] = true;
                s2_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut k = 0usize;
    for i in (0..len1).filter(|&i| s1_matched[i]) {
        while k < len2 && !s2_matched[k] {
            k += 1;
        }
        if s1[i] != s2[k] {
            transpositions += 1;
        }
        k += 1;
    }

    // Halved as integers before the float conversion.
    let t = (transpositions / 2) as f64;
    let m = matches as f64;
    let jaro = (m / len1 as f64 + m / len2 as f64 + (m - t) / m) / 3.0;

    let prefix = s1
        .iter()
        .zip(s2.iter())
        .take(WINKLER_PREFIX_MAX)
        .take_while(|(a, b)| a == b)
        .count();

    jaro + prefix as f64 * WINKLER_SCALING * (1.0 - jaro)
}

/// Classic unit-cost edit distance between two strings, counted in characters
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Edit distance normalized to `1 - distance / max(len1, len2)`
pub fn levenshtein_similarity(s1: &str, s2: &str) -> f64 {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    match (len1, len2) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        _ => {
            let distance = levenshtein_distance(s1, s2);
            1.0 - distance as f64 / len1.max(len2) as f64
        }
    }
}
