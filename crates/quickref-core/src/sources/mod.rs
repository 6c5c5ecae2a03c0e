//! Source fetchers for the remote cheat sheet providers.
//!
//! Each fetcher takes a trimmed search term and produces a normalized list of
//! scored [`CheatSheetItem`]s. Fetchers report failures through
//! [`FetchError`] instead of swallowing them; the aggregation engine is the
//! one that decides to discard a failed source, which keeps failure paths
//! auditable while staying silent towards the caller.

pub mod cheatsh;
pub mod devhints;
pub mod tldr;

use std::time::Duration;

use thiserror::Error;

/// Per-request timeout. Shorter than the engine's overall deadline so a
/// single slow source cannot consume the whole budget.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(6);

/// Errors from a single source fetch. Never surfaced past the engine.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    Status(u16),

    #[error("response body is an HTML error page")]
    HtmlErrorPage,

    #[error("response body is empty")]
    EmptyBody,
}

/// Shared HTTP client for all three source families.
///
/// One client, one connection pool: a descriptive user agent, gzip/deflate
/// decompression, and a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct SourceClient {
    http: reqwest::Client,
}

impl SourceClient {
    /// Build the shared client.
    pub fn new() -> Result<Self, FetchError> {
        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // The `Err` case just means it was already installed — safe to ignore.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .user_agent(concat!("QuickRef/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { http })
    }

    /// GET a URL and return the body, mapping non-success statuses to
    /// [`FetchError::Status`] and blank bodies to [`FetchError::EmptyBody`].
    pub(crate) async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body)
    }

    /// Like [`get_text`] but non-success statuses yield `Ok(None)`. Used by
    /// the tldr fetcher where a missing page is the normal probe result.
    pub(crate) async fn try_get_text(&self, url: &str) -> Result<Option<String>, FetchError> {
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(body))
    }
}

/// Whether a payload looks like an HTML error page rather than plain text.
pub(crate) fn looks_like_html(payload: &str) -> bool {
    let lower = payload.to_lowercase();
    lower.contains("<html")
        || lower.starts_with("<!doctype")
        || lower.contains("<head>")
        || lower.contains("<title>")
}
