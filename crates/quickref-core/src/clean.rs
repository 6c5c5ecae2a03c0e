//! Shared command-syntax cleaner.
//!
//! Remote sources mix markup into their snippets: tldr-style `{{...}}`
//! placeholders, stray HTML, ANSI color codes, shell prompt markers. Every
//! fetcher funnels candidate command lines through [`clean_command_syntax`]
//! before emitting an item; an empty result means the line should be dropped.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static HTML_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>.*?</[^>]+>").expect("static regex is valid"));

#[allow(clippy::expect_used)]
static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex is valid"));

// {{[-A|--all]}} -> [-A|--all]
#[allow(clippy::expect_used)]
static BRACE_OPTIONAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\[.*?\])\}\}").expect("static regex is valid"));

// {{text}} -> text, while single-brace {placeholder} stays untouched
#[allow(clippy::expect_used)]
static BRACE_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("static regex is valid"));

#[allow(clippy::expect_used)]
static LEADING_DOLLAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\$\s*").expect("static regex is valid"));

#[allow(clippy::expect_used)]
static LEADING_HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*").expect("static regex is valid"));

#[allow(clippy::expect_used)]
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));

#[allow(clippy::expect_used)]
static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("static regex is valid"));

#[allow(clippy::expect_used)]
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("static regex is valid"));

/// Pattern used by fetchers to drop whole lines that are still HTML.
#[allow(clippy::expect_used)]
pub static HTML_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex is valid"));

/// Normalize a raw command line from a remote source.
///
/// Returns the trimmed result; an empty string signals "discard this line".
pub fn clean_command_syntax(command: &str) -> String {
    if command.trim().is_empty() {
        return String::new();
    }

    let mut cleaned = command.to_string();

    // HTML that slipped through the source's own formatting
    cleaned = HTML_PAIR_RE.replace_all(&cleaned, "").into_owned();
    cleaned = HTML_TAG_RE.replace_all(&cleaned, "").into_owned();

    // Collapse doubled-brace markers while preserving {single-brace} placeholders
    cleaned = BRACE_OPTIONAL_RE.replace_all(&cleaned, "$1").into_owned();
    cleaned = BRACE_LITERAL_RE.replace_all(&cleaned, "$1").into_owned();

    // Shell prompt markers
    cleaned = LEADING_DOLLAR_RE.replace(&cleaned, "").into_owned();
    cleaned = LEADING_HASH_RE.replace(&cleaned, "").into_owned();

    // Literal escape sequences and whitespace runs
    cleaned = cleaned.replace("\\n", " ");
    cleaned = cleaned.replace("\\t", " ");
    cleaned = WHITESPACE_RE.replace_all(&cleaned, " ").into_owned();

    // ANSI color codes from terminal-oriented sources
    cleaned = ANSI_RE.replace_all(&cleaned, "").into_owned();

    // Strip bare URLs unless the line is a clone-style command where the URL
    // is the argument
    if cleaned.contains("http") && !cleaned.to_lowercase().starts_with("git clone") {
        cleaned = URL_RE.replace_all(&cleaned, "").trim().to_string();
    }

    // Unwrap a command fully wrapped in one pair of backticks or quotes
    if cleaned.starts_with('`')
        && cleaned.ends_with('`')
        && cleaned.matches('`').count() == 2
    {
        cleaned = cleaned.trim_matches('`').to_string();
    }
    if cleaned.starts_with('"')
        && cleaned.ends_with('"')
        && cleaned.matches('"').count() == 2
    {
        cleaned = cleaned.trim_matches('"').to_string();
    }

    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_optional_argument_braces() {
        assert_eq!(clean_command_syntax("{{[-A|--all]}}"), "[-A|--all]");
        assert_eq!(
            clean_command_syntax("git add {{[-A|--all]}}"),
            "git add [-A|--all]"
        );
    }

    #[test]
    fn collapses_literal_braces_but_keeps_single() {
        assert_eq!(
            clean_command_syntax("git clone {{https://x/y.git}}"),
            "git clone https://x/y.git"
        );
        assert_eq!(
            clean_command_syntax("git clone {repository-url}"),
            "git clone {repository-url}"
        );
    }

    #[test]
    fn strips_leading_prompt_markers() {
        assert_eq!(clean_command_syntax("$ ls -la"), "ls -la");
        assert_eq!(clean_command_syntax("  # mount /dev/sda1"), "mount /dev/sda1");
    }

    #[test]
    fn strips_html() {
        assert_eq!(clean_command_syntax("ls <b>-la</b>"), "ls");
        assert_eq!(clean_command_syntax("<span>docker ps"), "docker ps");
    }

    #[test]
    fn strips_ansi_escapes() {
        assert_eq!(clean_command_syntax("\x1b[1;32mgit status\x1b[0m"), "git status");
    }

    #[test]
    fn strips_bare_urls_except_clone_commands() {
        assert_eq!(
            clean_command_syntax("curl https://example.com/data.json"),
            "curl"
        );
        assert_eq!(
            clean_command_syntax("git clone https://example.com/repo.git"),
            "git clone https://example.com/repo.git"
        );
    }

    #[test]
    fn unwraps_fully_wrapped_commands() {
        assert_eq!(clean_command_syntax("`git log`"), "git log");
        assert_eq!(clean_command_syntax("\"git log\""), "git log");
        // Interior backticks are not a full wrap
        assert_eq!(clean_command_syntax("a `b` c"), "a `b` c");
    }

    #[test]
    fn collapses_escapes_and_whitespace() {
        assert_eq!(clean_command_syntax("ls\\n-la   -h"), "ls -la -h");
        assert_eq!(clean_command_syntax("ls\\t-la"), "ls -la");
    }

    #[test]
    fn whitespace_only_input_is_discard_signal() {
        assert_eq!(clean_command_syntax("   "), "");
        assert_eq!(clean_command_syntax("<b></b>"), "");
    }
}
