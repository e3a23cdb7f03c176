//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.
//! The API key is the single fatal requirement — the session never starts
//! without it.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AgentError;

/// Default model for the information (document-search) agent.
const DEFAULT_INFORMATION_MODEL: &str = "gpt-4o-mini";
/// Default model for the research (web) agent.
const DEFAULT_RESEARCH_MODEL: &str = "gpt-4o-mini";
/// Default information agent max tokens. Set high enough for structured
/// extraction output (lists, tables) from dense booklet text.
const DEFAULT_INFORMATION_MAX_TOKENS: u32 = 4096;
/// Default research agent max tokens.
const DEFAULT_RESEARCH_MAX_TOKENS: u32 = 4096;
/// Default per-call timeout in seconds. Bounds worst-case turn latency:
/// a turn makes at most two model calls.
const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Default path to the local copy of the MediShield Life booklet.
const DEFAULT_DOCUMENT_PATH: &str = "reference/medishield-life-booklet.txt";

/// Fixed whitelist of CPF MediSave reference pages for the research agent.
///
/// Content outside this whitelist is out of scope and never fetched.
pub const DEFAULT_REFERENCE_URLS: &[&str] = &[
    "https://www.cpf.gov.sg/member/healthcare-financing/using-your-medisave-savings",
    "https://www.cpf.gov.sg/member/healthcare-financing/using-your-medisave-savings/using-medisave-for-outpatient-treatments",
    "https://www.cpf.gov.sg/member/healthcare-financing/using-your-medisave-savings/using-medisave-for-hospitalisation",
    "https://www.cpf.gov.sg/member/healthcare-financing/using-your-medisave-savings/applying-to-use-your-healthcare-plans",
];

/// Configuration for the agent system.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Model for the information (document-search) agent.
    pub information_model: String,
    /// Model for the research (web) agent.
    pub research_model: String,
    /// Maximum tokens for information agent responses.
    pub information_max_tokens: u32,
    /// Maximum tokens for research agent responses.
    pub research_max_tokens: u32,
    /// Per-call timeout for model requests.
    pub timeout: Duration,
    /// Path to the local reference document the information agent searches.
    pub document_path: PathBuf,
    /// Whitelisted reference pages the research agent may scrape.
    pub reference_urls: Vec<String>,
    /// Directory containing prompt template files.
    ///
    /// When set, the agent system loads system prompts from markdown files
    /// in this directory, falling back to compiled-in defaults for any
    /// missing files.
    pub prompt_dir: Option<PathBuf>,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    information_model: Option<String>,
    research_model: Option<String>,
    information_max_tokens: Option<u32>,
    research_max_tokens: Option<u32>,
    timeout: Option<Duration>,
    document_path: Option<PathBuf>,
    reference_urls: Option<Vec<String>>,
    prompt_dir: Option<PathBuf>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = std::env::var("MEDIDESK_PROVIDER").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY")
                .or_else(|_| std::env::var("MEDIDESK_API_KEY"))
                .ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL")
                .or_else(|_| std::env::var("MEDIDESK_BASE_URL"))
                .ok();
        }
        if self.information_model.is_none() {
            self.information_model = std::env::var("MEDIDESK_INFORMATION_MODEL").ok();
        }
        if self.research_model.is_none() {
            self.research_model = std::env::var("MEDIDESK_RESEARCH_MODEL").ok();
        }
        if self.document_path.is_none() {
            self.document_path = std::env::var("MEDIDESK_DOCUMENT").ok().map(PathBuf::from);
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = std::env::var("MEDIDESK_PROMPT_DIR").ok().map(PathBuf::from);
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the information agent model.
    #[must_use]
    pub fn information_model(mut self, model: impl Into<String>) -> Self {
        self.information_model = Some(model.into());
        self
    }

    /// Sets the research agent model.
    #[must_use]
    pub fn research_model(mut self, model: impl Into<String>) -> Self {
        self.research_model = Some(model.into());
        self
    }

    /// Sets the information agent max tokens.
    #[must_use]
    pub const fn information_max_tokens(mut self, n: u32) -> Self {
        self.information_max_tokens = Some(n);
        self
    }

    /// Sets the research agent max tokens.
    #[must_use]
    pub const fn research_max_tokens(mut self, n: u32) -> Self {
        self.research_max_tokens = Some(n);
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the reference document path.
    #[must_use]
    pub fn document_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.document_path = Some(path.into());
        self
    }

    /// Sets the research whitelist URLs.
    #[must_use]
    pub fn reference_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_urls = Some(urls.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key was set.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self.api_key.ok_or(AgentError::ApiKeyMissing)?;

        Ok(AgentConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url,
            information_model: self
                .information_model
                .unwrap_or_else(|| DEFAULT_INFORMATION_MODEL.to_string()),
            research_model: self
                .research_model
                .unwrap_or_else(|| DEFAULT_RESEARCH_MODEL.to_string()),
            information_max_tokens: self
                .information_max_tokens
                .unwrap_or(DEFAULT_INFORMATION_MAX_TOKENS),
            research_max_tokens: self.research_max_tokens.unwrap_or(DEFAULT_RESEARCH_MAX_TOKENS),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            document_path: self
                .document_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_PATH)),
            reference_urls: self.reference_urls.unwrap_or_else(|| {
                DEFAULT_REFERENCE_URLS
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            }),
            prompt_dir: self.prompt_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AgentConfig::builder()
            .api_key("test-key")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.provider, "openai");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.information_model, DEFAULT_INFORMATION_MODEL);
        assert_eq!(config.reference_urls.len(), DEFAULT_REFERENCE_URLS.len());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = AgentConfig::builder().build();
        assert!(matches!(result, Err(AgentError::ApiKeyMissing)));
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AgentConfig::builder()
            .api_key("key")
            .provider("custom")
            .information_model("gpt-4o")
            .research_model("gpt-3.5-turbo")
            .timeout(Duration::from_secs(30))
            .document_path("/tmp/booklet.txt")
            .reference_urls(["https://example.gov/a"])
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.provider, "custom");
        assert_eq!(config.information_model, "gpt-4o");
        assert_eq!(config.research_model, "gpt-3.5-turbo");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.document_path, PathBuf::from("/tmp/booklet.txt"));
        assert_eq!(config.reference_urls, vec!["https://example.gov/a"]);
    }

    #[test]
    fn test_default_whitelist_is_cpf_only() {
        for url in DEFAULT_REFERENCE_URLS {
            assert!(url.starts_with("https://www.cpf.gov.sg/"));
        }
    }
}
