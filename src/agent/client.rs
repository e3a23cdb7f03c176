//! Provider factory for the search agents.
//!
//! Both search agents share one provider instance per session; the name
//! comes from `AgentConfig::provider` (the `MEDIDESK_PROVIDER` variable,
//! defaulting to `"openai"`). Anything OpenAI-compatible — Azure, local
//! proxies — is reached through the `openai` backend with a base-URL
//! override, so no other backend has been needed yet.

use crate::agent::config::AgentConfig;
use crate::agent::provider::LlmProvider;
use crate::agent::providers::OpenAiProvider;
use crate::error::AgentError;

/// Creates the provider the orchestrator hands to both search agents.
///
/// # Errors
///
/// Returns [`AgentError::UnsupportedProvider`] when the configured name is
/// not a known backend.
pub fn create_provider(config: &AgentConfig) -> Result<Box<dyn LlmProvider>, AgentError> {
    match config.provider.as_str() {
        "openai" => Ok(Box::new(OpenAiProvider::new(config))),
        other => Err(AgentError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}
