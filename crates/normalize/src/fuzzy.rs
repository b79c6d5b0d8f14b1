//! Fuzzy string matching shared by the local category fallback and the
//! lookup service, so both sites agree on scoring semantics.

/// Best candidate for a query, with a similarity score in 0–100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub name: String,
    pub score: u8,
}

/// Returns the best-scoring candidate for `query`, or `None` for an empty
/// query or empty candidate list. Comparison is case-insensitive; ties are
/// broken by candidate order (first occurrence wins).
pub fn best_match<'a, I>(query: &str, candidates: I) -> Option<FuzzyMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let mut best: Option<FuzzyMatch> = None;
    for candidate in candidates {
        let score = similarity(&query, &candidate.to_lowercase());
        // Strict comparison keeps the earliest candidate on ties.
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(FuzzyMatch { name: candidate.to_string(), score });
        }
    }
    best
}

/// Normalized Levenshtein similarity, rounded to an integer in 0–100.
pub fn similarity(s1: &str, s2: &str) -> u8 {
    let max_len = s1.chars().count().max(s2.chars().count());
    if max_len == 0 {
        return 100;
    }
    let dist = levenshtein_distance(s1, s2);
    (100.0 * (1.0 - dist as f64 / max_len as f64)).round() as u8
}

/// Levenshtein edit distance using the two-row O(min(m,n)) space algorithm.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (m, n) = (a.len(), b.len());

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Keep the shorter string in the inner loop to minimise allocation.
    let (a, b, m, n) = if m <= n { (a, b, m, n) } else { (b, a, n, m) };

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
