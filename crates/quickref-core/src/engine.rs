//! Aggregation engine: concurrent fan-out, dedup, ranking, caching.
//!
//! A query enters here, gets checked against the response cache, and on a
//! miss fans out to one tokio task per enabled source under a single overall
//! deadline. Whatever finished in time is merged, deduplicated by
//! `(source, command)` keeping the best score, sorted, cached, and returned.
//! Individual source failures never surface to the caller; the only visible
//! degradation is a shorter result list.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::config::SourceOptions;
use crate::item::CheatSheetItem;
use crate::sources::{FetchError, SourceClient};

/// Overall fan-out deadline. Longer than any single request timeout, short
/// enough for interactive use.
const AGGREGATE_DEADLINE: Duration = Duration::from_secs(8);

/// Cache duration fallback when the configured duration is non-positive.
const FALLBACK_CACHE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Bump when the result shape or scoring changes so stale entries die.
const CACHE_KEY_VERSION: &str = "cheats:v4";

/// Most suggestions ever returned by [`CheatSheetEngine::suggest`].
const MAX_SUGGESTIONS: usize = 6;

/// Hand-picked follow-on phrases for well-known topics, tried before the
/// generic topic vocabulary. Order matters: earlier keys win for prefixes.
const SMART_SUGGESTIONS: &[(&str, &[&str])] = &[
    ("git", &[
        "git reset", "git commit", "git merge", "git rebase", "git stash", "git branch",
        "git checkout", "git log", "git diff", "git push", "git rm", "git add", "git pull",
        "git clone",
    ]),
    ("docker", &[
        "docker build", "docker compose", "docker run", "docker volume", "docker network",
        "docker ps", "docker exec", "docker logs", "docker pull", "docker push",
    ]),
    ("kubernetes", &[
        "kubectl get", "kubectl apply", "kubectl describe", "kubectl logs", "kubectl exec",
        "kubectl delete", "kubectl create", "kubectl port-forward",
    ]),
    ("k8s", &[
        "kubectl get", "kubectl apply", "kubectl describe", "kubectl logs", "kubectl exec",
    ]),
    ("kubectl", &[
        "kubectl get pods", "kubectl apply -f", "kubectl describe", "kubectl logs",
        "kubectl exec -it",
    ]),
    ("vim", &["vim navigation", "vim search", "vim replace", "vim commands", "vim modes"]),
    ("bash", &[
        "bash loops", "bash conditionals", "bash variables", "bash functions", "bash arrays",
    ]),
    ("powershell", &[
        "powershell cmdlets", "powershell variables", "powershell objects", "powershell loops",
    ]),
    ("regex", &[
        "regex lookahead", "regex groups", "regex anchors", "regex quantifiers",
        "regex character classes",
    ]),
    ("sql", &[
        "sql select", "sql join", "sql insert", "sql update", "sql delete", "sql create table",
    ]),
    ("python", &[
        "python list", "python dict", "python functions", "python classes", "python loops",
    ]),
    ("javascript", &[
        "javascript array", "javascript object", "javascript promises", "javascript async",
        "javascript dom",
    ]),
    ("js", &[
        "javascript array", "javascript object", "javascript promises", "javascript async",
    ]),
    ("node", &["node modules", "node fs", "node http", "node express", "node package.json"]),
    ("npm", &["npm install", "npm run", "npm scripts", "npm publish", "npm update"]),
    ("yarn", &["yarn add", "yarn install", "yarn run", "yarn workspace"]),
    ("aws", &["aws s3", "aws ec2", "aws lambda", "aws cli", "aws iam"]),
    ("linux", &[
        "linux commands", "linux permissions", "linux processes", "linux networking",
        "linux file system",
    ]),
];

/// Fixed topic vocabulary for the suggestion fallback tier.
const COMMON_TOPICS: &[&str] = &[
    "git", "docker", "kubernetes", "python", "javascript", "typescript", "react", "vue",
    "angular", "node", "npm", "yarn", "bash", "powershell", "sql", "mongodb", "redis", "aws",
    "azure", "gcp", "linux", "vim", "regex", "css", "html", "java", "c#", "go", "ssh", "scp",
    "tmux", "ffmpeg", "curl", "kubectl", "helm", "podman", "nginx", "apache", "mysql",
    "postgresql", "elasticsearch", "webpack", "vscode", "jupyter", "conda", "pip",
];

/// Core engine querying the remote providers and normalising the results.
pub struct CheatSheetEngine {
    sources: Arc<SourceClient>,
    cache: ResponseCache<Vec<CheatSheetItem>>,
}

impl CheatSheetEngine {
    /// Build the engine with its HTTP client and response cache.
    /// Requires a tokio runtime (the cache starts its sweep task).
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            sources: Arc::new(SourceClient::new()?),
            cache: ResponseCache::new(),
        })
    }

    /// Search the enabled sources, returning a deduplicated list ordered by
    /// descending score. Never fails; a fully degraded call returns an empty
    /// list.
    pub async fn search(&self, term: &str, options: &SourceOptions) -> Vec<CheatSheetItem> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let key = cache_key(trimmed, options);
        if let Some(cached) = self.cache.get(&key) {
            debug!(key, "cache hit");
            return cached;
        }

        let mut handles: Vec<(&'static str, FetchHandle)> = Vec::new();

        if options.enable_cheat_sh {
            let sources = Arc::clone(&self.sources);
            let term = trimmed.to_string();
            handles.push((
                "cheat.sh",
                tokio::spawn(async move { sources.cheat_sh(&term).await }),
            ));
        }
        if options.enable_dev_hints {
            let sources = Arc::clone(&self.sources);
            let term = trimmed.to_string();
            handles.push((
                "devhints",
                tokio::spawn(async move { sources.dev_hints(&term).await }),
            ));
        }
        if options.enable_tldr {
            let sources = Arc::clone(&self.sources);
            let term = trimmed.to_string();
            handles.push((
                "tldr",
                tokio::spawn(async move { sources.tldr(&term).await }),
            ));
        }

        if handles.is_empty() {
            return Vec::new();
        }

        let deadline = tokio::time::Instant::now() + AGGREGATE_DEADLINE;
        let combined = collect_with_deadline(handles, deadline).await;
        let deduped = dedup_and_sort(combined);

        if !deduped.is_empty() {
            let ttl = if options.cache_duration > Duration::ZERO {
                options.cache_duration
            } else {
                FALLBACK_CACHE_TTL
            };
            self.cache.set(&key, deduped.clone(), ttl);
        }

        deduped
    }

    /// Autocomplete suggestions for a partial query. Curated topic phrases
    /// first, then the generic topic vocabulary.
    pub fn suggest(&self, term: &str) -> Vec<String> {
        suggest_topics(term)
    }
}

type FetchHandle = JoinHandle<Result<Vec<CheatSheetItem>, FetchError>>;

/// Versioned cache key over the normalized term and the source enable-flags,
/// so toggling sources never serves a stale combination.
fn cache_key(trimmed_term: &str, options: &SourceOptions) -> String {
    format!(
        "{CACHE_KEY_VERSION}::{}::{}_{}_{}",
        trimmed_term.to_lowercase(),
        options.enable_dev_hints,
        options.enable_tldr,
        options.enable_cheat_sh,
    )
}

/// Join every fan-out task against one shared deadline. Tasks still running
/// at the deadline are aborted and contribute nothing; failed tasks are
/// logged and discarded. Only results of observed-complete tasks are read.
async fn collect_with_deadline(
    handles: Vec<(&'static str, FetchHandle)>,
    deadline: tokio::time::Instant,
) -> Vec<CheatSheetItem> {
    let mut combined = Vec::new();

    for (source, mut handle) in handles {
        match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(Ok(Ok(items))) => combined.extend(items),
            Ok(Ok(Err(err))) => debug!(source, error = %err, "source degraded to empty"),
            Ok(Err(err)) => warn!(source, error = %err, "source task failed"),
            Err(_) => {
                handle.abort();
                warn!(source, "source abandoned at aggregation deadline");
            }
        }
    }

    combined
}

/// Group by `(source_name, command)`, keep the highest score per group
/// (first encountered wins ties), and sort by descending score.
fn dedup_and_sort(items: Vec<CheatSheetItem>) -> Vec<CheatSheetItem> {
    let mut kept: Vec<CheatSheetItem> = Vec::with_capacity(items.len());
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for item in items {
        match index.get(&item.dedup_key()) {
            Some(&i) => {
                if item.score > kept[i].score {
                    kept[i] = item;
                }
            }
            None => {
                index.insert(item.dedup_key(), kept.len());
                kept.push(item);
            }
        }
    }

    kept.sort_by(|a, b| b.score.cmp(&a.score));
    kept
}

/// Autocomplete suggestions for a partial query, usable without building an
/// engine (the tables are static).
pub fn suggest_topics(term: &str) -> Vec<String> {
    let term = term.to_lowercase();
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }

    let mut suggestions: Vec<String> = Vec::new();

    for (topic, phrases) in SMART_SUGGESTIONS {
        if term == *topic {
            suggestions.extend(phrases.iter().take(MAX_SUGGESTIONS).map(ToString::to_string));
            break;
        }
        if let Some(subterm) = term.strip_prefix(&format!("{topic} ")) {
            suggestions.extend(
                phrases
                    .iter()
                    .filter(|p| p.contains(subterm))
                    .take(MAX_SUGGESTIONS)
                    .map(ToString::to_string),
            );
            break;
        }
    }

    if suggestions.is_empty() {
        suggestions.extend(
            COMMON_TOPICS
                .iter()
                .filter(|topic| **topic == term)
                .take(2)
                .map(ToString::to_string),
        );
        suggestions.extend(
            COMMON_TOPICS
                .iter()
                .filter(|topic| topic.starts_with(term) && **topic != term)
                .take(3)
                .map(ToString::to_string),
        );
        if suggestions.len() < 5 {
            let remaining = 5 - suggestions.len();
            suggestions.extend(
                COMMON_TOPICS
                    .iter()
                    .filter(|topic| topic.contains(term) && !topic.starts_with(term))
                    .take(remaining)
                    .map(ToString::to_string),
            );
        }
    }

    let mut deduped = Vec::new();
    for s in suggestions {
        if !deduped.contains(&s) {
            deduped.push(s);
        }
        if deduped.len() >= MAX_SUGGESTIONS {
            break;
        }
    }
    deduped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(source: &str, command: &str, score: u32) -> CheatSheetItem {
        CheatSheetItem {
            title: command.to_string(),
            description: String::new(),
            command: command.to_string(),
            url: "https://example.com".to_string(),
            source_name: source.to_string(),
            score,
        }
    }

    #[test]
    fn dedup_keeps_highest_score_per_source_command_pair() {
        let deduped = dedup_and_sort(vec![
            item("cheat.sh", "git rm", 120),
            item("cheat.sh", "git rm", 180),
            item("tldr (common)", "git rm", 150),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].score, 180);
        assert_eq!(deduped[0].source_name, "cheat.sh");
        assert_eq!(deduped[1].score, 150);
    }

    #[test]
    fn dedup_tie_keeps_first_encountered() {
        let first = item("cheat.sh", "git rm", 100);
        let mut second = item("cheat.sh", "git rm", 100);
        second.description = "later duplicate".to_string();
        let deduped = dedup_and_sort(vec![first, second]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].description, "");
    }

    #[test]
    fn results_sorted_by_descending_score() {
        let deduped = dedup_and_sort(vec![
            item("a", "one", 10),
            item("b", "two", 200),
            item("c", "three", 90),
        ]);
        let scores: Vec<u32> = deduped.iter().map(|i| i.score).collect();
        assert_eq!(scores, vec![200, 90, 10]);
    }

    #[test]
    fn cache_key_incorporates_flags_and_normalized_term() {
        let mut options = SourceOptions::default();
        let a = cache_key("Git RM", &options);
        assert_eq!(a, "cheats:v4::git rm::true_true_true");

        options.enable_tldr = false;
        let b = cache_key("git rm", &options);
        assert_ne!(a, b);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_abandons_slow_sources_but_keeps_fast_ones() {
        let fast: FetchHandle = tokio::spawn(async { Ok(vec![item("fast", "git rm", 100)]) });
        let slow: FetchHandle = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok(vec![item("slow", "git rm", 999)])
        });

        let deadline = tokio::time::Instant::now() + AGGREGATE_DEADLINE;
        let combined = collect_with_deadline(vec![("fast", fast), ("slow", slow)], deadline).await;

        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].source_name, "fast");
    }

    #[tokio::test]
    async fn failed_sources_are_discarded_silently() {
        let ok: FetchHandle = tokio::spawn(async { Ok(vec![item("ok", "ls", 80)]) });
        let failed: FetchHandle = tokio::spawn(async { Err(FetchError::Status(503)) });

        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        let combined = collect_with_deadline(vec![("ok", ok), ("failed", failed)], deadline).await;

        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].source_name, "ok");
    }

    #[tokio::test]
    async fn search_with_no_enabled_sources_is_empty() {
        let engine = CheatSheetEngine::new().unwrap();
        let options = SourceOptions {
            enable_cheat_sh: false,
            enable_dev_hints: false,
            enable_tldr: false,
            ..SourceOptions::default()
        };
        assert!(engine.search("git rm", &options).await.is_empty());
    }

    #[tokio::test]
    async fn blank_term_is_empty_without_touching_sources() {
        let engine = CheatSheetEngine::new().unwrap();
        assert!(engine.search("   ", &SourceOptions::default()).await.is_empty());
    }

    #[test]
    fn exact_topic_returns_canned_suggestions() {
        let suggestions = suggest_topics("git");
        assert_eq!(suggestions.len(), 6);
        assert_eq!(suggestions[0], "git reset");
    }

    #[test]
    fn topic_with_remainder_filters_canned_suggestions() {
        let suggestions = suggest_topics("git re");
        assert!(suggestions.contains(&"git reset".to_string()));
        assert!(suggestions.contains(&"git rebase".to_string()));
        assert!(!suggestions.contains(&"git push".to_string()));
    }

    #[test]
    fn unknown_term_falls_back_to_topic_vocabulary() {
        let suggestions = suggest_topics("type");
        assert!(suggestions.contains(&"typescript".to_string()));
    }

    #[test]
    fn suggestions_capped_at_six_and_deduplicated() {
        let suggestions = suggest_topics("git");
        assert!(suggestions.len() <= MAX_SUGGESTIONS);
        let mut unique = suggestions.clone();
        unique.dedup();
        assert_eq!(unique, suggestions);
    }

    #[test]
    fn blank_suggestion_term_is_empty() {
        assert!(suggest_topics("  ").is_empty());
    }
}
