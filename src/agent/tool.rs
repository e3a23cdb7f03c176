//! Reference tools for the search agents.
//!
//! Each tool exposes the same narrow interface: `invoke(query)` returns
//! relevant reference text or a [`ToolError`]. Callers treat every error
//! as "nothing found" — a broken tool degrades the pipeline, it never
//! crashes it.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::warn;

use crate::error::ToolError;

/// Maximum passages returned per source. Keeps the extraction prompt
/// bounded for dense reference documents.
const MAX_PASSAGES_PER_SOURCE: usize = 12;

/// Maximum byte length of a single passage before truncation.
const MAX_PASSAGE_LEN: usize = 2_000;

/// A provider of reference text for a search agent.
#[async_trait]
pub trait ReferenceTool: Send + Sync {
    /// Tool name for logging and event payloads.
    fn name(&self) -> &'static str;

    /// Fetches reference text relevant to the query.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] when the source holds nothing
    /// relevant, and I/O or fetch variants on infrastructure failures.
    /// Callers treat all variants identically.
    async fn invoke(&self, query: &str) -> Result<String, ToolError>;
}

/// Searches a single fixed local reference document.
///
/// The document is the plain-text copy of the MediShield Life information
/// booklet. Passages are selected by literal token overlap with the query;
/// the information agent's model then extracts from those passages only.
#[derive(Debug, Clone)]
pub struct DocumentSearchTool {
    path: PathBuf,
}

impl DocumentSearchTool {
    /// Creates a tool over the document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the reference document.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl ReferenceTool for DocumentSearchTool {
    fn name(&self) -> &'static str {
        "document_search"
    }

    async fn invoke(&self, query: &str) -> Result<String, ToolError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        select_passages(&text, query).ok_or(ToolError::NotFound)
    }
}

/// Scrapes a fixed whitelist of reference web pages.
///
/// Only the URLs supplied at construction are ever fetched; the query never
/// influences which pages are requested. Pages that fail to fetch are
/// skipped — the tool reports a fetch error only when every page failed.
pub struct WebScrapeTool {
    client: reqwest::Client,
    urls: Vec<String>,
}

impl WebScrapeTool {
    /// Creates a tool over the given whitelist with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Fetch`] if the HTTP client cannot be built.
    pub fn new<I, S>(urls: I, timeout: Duration) -> Result<Self, ToolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ToolError::Fetch {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            urls: urls.into_iter().map(Into::into).collect(),
        })
    }

    /// The whitelisted URLs this tool may fetch.
    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

impl std::fmt::Debug for WebScrapeTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebScrapeTool")
            .field("urls", &self.urls)
            .finish()
    }
}

#[async_trait]
impl ReferenceTool for WebScrapeTool {
    fn name(&self) -> &'static str {
        "web_scrape"
    }

    async fn invoke(&self, query: &str) -> Result<String, ToolError> {
        let mut sections = Vec::new();
        let mut last_error: Option<ToolError> = None;

        for url in &self.urls {
            let body = match self.fetch(url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(url, error = %e, "reference page fetch failed, skipping");
                    last_error = Some(e);
                    continue;
                }
            };
            let text = strip_tags(&body);
            if let Some(passages) = select_passages(&text, query) {
                sections.push(format!("## Source: {url}\n\n{passages}"));
            }
        }

        if sections.is_empty() {
            return Err(last_error.unwrap_or(ToolError::NotFound));
        }
        Ok(sections.join("\n\n"))
    }
}

impl WebScrapeTool {
    async fn fetch(&self, url: &str) -> Result<String, ToolError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ToolError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        response.text().await.map_err(|e| ToolError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

// Patterns are literals validated by the strip_tags tests.
#[allow(clippy::unwrap_used)]
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap());

#[allow(clippy::unwrap_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());

/// Strips HTML down to readable text: script/style blocks removed, tags
/// replaced with newlines, whitespace collapsed per line.
#[must_use]
pub(crate) fn strip_tags(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    let without_tags = TAG_RE.replace_all(&without_scripts, "\n");
    let mut lines: Vec<&str> = without_tags
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines.dedup();
    lines.join("\n\n")
}

/// Selects paragraphs sharing at least one query token, capped and
/// truncated. Returns `None` when nothing overlaps.
#[must_use]
pub(crate) fn select_passages(text: &str, query: &str) -> Option<String> {
    let tokens: Vec<String> = query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|t| t.len() >= 3)
        .map(ToString::to_string)
        .collect();
    if tokens.is_empty() {
        return None;
    }

    let mut passages: Vec<String> = Vec::new();
    for paragraph in text.split("\n\n") {
        let trimmed = paragraph.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lowered = trimmed.to_lowercase();
        if tokens.iter().any(|t| lowered.contains(t.as_str())) {
            let mut passage = trimmed.to_string();
            if passage.len() > MAX_PASSAGE_LEN {
                let mut cut = MAX_PASSAGE_LEN;
                while !passage.is_char_boundary(cut) {
                    cut -= 1;
                }
                passage.truncate(cut);
            }
            passages.push(passage);
            if passages.len() >= MAX_PASSAGES_PER_SOURCE {
                break;
            }
        }
    }

    if passages.is_empty() {
        None
    } else {
        Some(passages.join("\n\n"))
    }
}
