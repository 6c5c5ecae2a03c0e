//! Fuzzy string matching for command discovery.
//!
//! Pure functions computing a 0-100 similarity score between a query and a
//! candidate string. Exact, prefix, and substring matches short-circuit at
//! fixed tiers; everything else takes the maximum of an edit-distance
//! similarity, a word-boundary score, and an ordered-subsequence score.

/// Default minimum score for [`is_fuzzy_match`].
pub const DEFAULT_MATCH_THRESHOLD: u32 = 30;

/// Calculate the fuzzy match score between a search term and a target.
///
/// Returns a value in `0..=100` where higher is a better match. Deterministic
/// and side-effect free; this is the shared primitive used by search ranking,
/// favorites filtering, and offline lookup.
pub fn fuzzy_score(search_term: &str, target: &str) -> u32 {
    if search_term.trim().is_empty() || target.trim().is_empty() {
        return 0;
    }

    let search = search_term.to_lowercase();
    let search = search.trim();
    let text = target.to_lowercase();

    if text == search {
        return 100;
    }
    if text.starts_with(search) {
        return 90;
    }
    if text.contains(search) {
        return 80;
    }

    let edit = levenshtein_similarity(search, &text);
    let boundary = word_boundary_score(search, &text);
    let sequence = sequence_score(search, &text);

    edit.max(boundary).max(sequence)
}

/// Check whether `search_term` fuzzy-matches `target` with a minimum score.
pub fn is_fuzzy_match(search_term: &str, target: &str, min_score: u32) -> bool {
    fuzzy_score(search_term, target) >= min_score
}

/// Similarity derived from Levenshtein distance, scaled to 0-100.
fn levenshtein_similarity(search: &str, text: &str) -> u32 {
    if search.is_empty() || text.is_empty() {
        return 0;
    }

    let distance = levenshtein_distance(search, text);
    let max_len = search.chars().count().max(text.chars().count());
    let similarity = (1.0 - distance as f64 / max_len as f64) * 100.0;

    if similarity > 0.0 { similarity as u32 } else { 0 }
}

fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// 75 if any word of the target starts with the query, 60 if any word merely
/// contains it. Words are split on space, hyphen, underscore, and dot.
fn word_boundary_score(search: &str, text: &str) -> u32 {
    let mut max_score = 0;
    for word in text
        .split([' ', '-', '_', '.'])
        .filter(|w| !w.is_empty())
    {
        if word.starts_with(search) {
            max_score = max_score.max(75);
        } else if word.contains(search) {
            max_score = max_score.max(60);
        }
    }
    max_score
}

/// Greedy in-order character matching, for typo tolerance. Scores matched
/// characters out of the query length, with a bonus when every character
/// matched, capped at 75 so exact tiers always win.
fn sequence_score(search: &str, text: &str) -> u32 {
    let search_chars: Vec<char> = search.chars().collect();
    if search_chars.len() < 2 {
        return 0;
    }

    let text_chars: Vec<char> = text.chars().collect();
    let mut text_index = 0;
    let mut matched = 0;

    for &ch in &search_chars {
        let mut found = false;
        for (i, &tc) in text_chars.iter().enumerate().skip(text_index) {
            if tc == ch {
                matched += 1;
                text_index = i + 1;
                found = true;
                break;
            }
        }
        if !found {
            break;
        }
    }

    let mut score = (matched * 100) / search_chars.len();
    if matched == search_chars.len() {
        score += 20;
    }

    (score as u32).min(75)
}
