//! Shared relevance scoring for online sources.
//!
//! Every fetcher scores its candidates through [`relevance_score`] so results
//! from heterogeneous sources stay comparable when the engine merges them.

/// Command prefixes that get a popularity bonus. Covers the verbs people
/// actually look up: git, docker, kubectl, npm/yarn, and core unix tools.
const POPULAR_PREFIXES: &[&str] = &[
    "git add",
    "git commit",
    "git push",
    "git pull",
    "git reset",
    "git log",
    "git rm",
    "git mv",
    "git checkout",
    "git branch",
    "docker run",
    "docker build",
    "docker ps",
    "docker exec",
    "docker compose",
    "kubectl get",
    "kubectl apply",
    "kubectl describe",
    "kubectl logs",
    "npm install",
    "npm run",
    "yarn add",
    "yarn install",
    "ls",
    "cd",
    "mkdir",
    "rm",
    "cp",
    "mv",
    "grep",
    "find",
    "sed",
    "awk",
];

/// Score a candidate command against the search term. Always >= 1.
///
/// Base score 50; exact/prefix/substring matches on the whole term add
/// 100/80/50, individual search words add length-weighted bonuses, matching
/// several words adds a combination bonus, overly long snippets are
/// penalized, and popular command prefixes get a fixed boost.
pub fn relevance_score(search_term: &str, command: &str, description: &str) -> u32 {
    let mut score: i32 = 50;
    let search = search_term.to_lowercase();
    let search = search.trim();
    let command_lower = command.to_lowercase();
    let description_lower = description.to_lowercase();

    if command_lower == search {
        score += 100;
    } else if command_lower.starts_with(search) {
        score += 80;
    } else if command_lower.contains(search) {
        score += 50;
    }

    if description_lower.contains(search) {
        score += 25;
    }

    let search_words: Vec<&str> = search.split_whitespace().collect();
    let mut matched_words = 0;

    for word in &search_words {
        if word.len() < 2 {
            continue;
        }

        // Longer words are more specific, so they weigh more.
        let word_bonus = (word.len() as i32 * 2).min(20);

        if command_lower.starts_with(word) {
            score += word_bonus * 2;
            matched_words += 1;
        } else if command_lower.contains(&format!(" {word}"))
            || command_lower.contains(&format!("-{word}"))
            || command_lower.contains(&format!("_{word}"))
        {
            score += word_bonus;
            matched_words += 1;
        } else if command_lower.contains(word) {
            score += word_bonus / 2;
            matched_words += 1;
        }

        if description_lower.contains(word) {
            score += (word_bonus / 3).min(5);
        }
    }

    if search_words.len() > 1 && matched_words > 1 {
        score += matched_words * 10;
    }

    // Very long snippets are rarely what the user wants.
    if command.len() > 100 {
        score -= 10;
    }

    if is_popular_command(&command_lower) {
        score += 15;
    }

    score.max(1) as u32
}

/// Whether a (lowercased) command starts with a well-known popular prefix.
pub fn is_popular_command(command: &str) -> bool {
    POPULAR_PREFIXES
        .iter()
        .any(|prefix| command.starts_with(prefix))
}
