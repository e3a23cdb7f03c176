//! Information agent: document search over the MediShield Life booklet.
//!
//! Invoked only when the keyword gate matched — the orchestrator enforces
//! the precondition, the agent does not re-check it. Extraction is
//! constrained to passages the document tool returned; the agent replies
//! with the explicit sentinel when the booklet holds nothing relevant.

use std::sync::Arc;

use async_trait::async_trait;

use super::config::AgentConfig;
use super::event::EventBus;
use super::finding::SearchOutcome;
use super::provider::LlmProvider;
use super::tool::ReferenceTool;
use super::traits::{Agent, run_search};
use crate::core::AgentRole;

/// Name of the source passed into the extraction prompt.
const SOURCE_NAME: &str = "medishield-life-booklet";

/// Agent that searches the fixed reference document.
pub struct InformationAgent {
    model: String,
    max_tokens: u32,
    timeout: std::time::Duration,
    system_prompt: String,
    tool: Arc<dyn ReferenceTool>,
}

impl InformationAgent {
    /// Creates the agent from configuration, a system prompt, and its
    /// document-search tool.
    #[must_use]
    pub fn new(config: &AgentConfig, system_prompt: String, tool: Arc<dyn ReferenceTool>) -> Self {
        Self {
            model: config.information_model.clone(),
            max_tokens: config.information_max_tokens,
            timeout: config.timeout,
            system_prompt,
            tool,
        }
    }

    /// Searches the reference document for content relevant to the query.
    ///
    /// Emits the Start / Action* / End event lifecycle on `bus` before
    /// returning. Never fails: tool and model errors degrade to
    /// [`Findings::Nothing`](super::finding::Findings::Nothing).
    pub async fn search(
        &self,
        provider: &dyn LlmProvider,
        bus: &EventBus,
        query: &str,
    ) -> SearchOutcome {
        run_search(self, provider, bus, &*self.tool, SOURCE_NAME, query).await
    }
}

#[async_trait]
impl Agent for InformationAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Information
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn timeout(&self) -> std::time::Duration {
        self.timeout
    }
}

impl std::fmt::Debug for InformationAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InformationAgent")
            .field("model", &self.model)
            .field("tool", &self.tool.name())
            .finish()
    }
}
