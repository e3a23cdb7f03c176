//! Research agent: web research over the whitelisted CPF MediSave pages.
//!
//! Invoked only when the keyword gate failed or the information agent
//! returned nothing. The scrape tool only ever fetches its fixed whitelist;
//! content outside it is out of scope by construction.

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
const SOURCE_NAME: &str = "cpf-medisave-pages";

/// Agent that researches the whitelisted reference pages.
pub struct ResearchAgent {
    model: String,
    max_tokens: u32,
    timeout: std::time::Duration,
    system_prompt: String,
    tool: Arc<dyn ReferenceTool>,
}

impl ResearchAgent {
    /// Creates the agent from configuration, a system prompt, and its
    /// web-scrape tool.
    #[must_use]
    pub fn new(config: &AgentConfig, system_prompt: String, tool: Arc<dyn ReferenceTool>) -> Self {
        Self {
            model: config.research_model.clone(),
            max_tokens: config.research_max_tokens,
            timeout: config.timeout,
            system_prompt,
            tool,
        }
    }

    /// Searches the whitelisted reference pages for content relevant to
    /// the query.
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
impl Agent for ResearchAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Research
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

impl std::fmt::Debug for ResearchAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchAgent")
            .field("model", &self.model)
            .field("tool", &self.tool.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::prompt::RESEARCH_SYSTEM_PROMPT;
    use crate::agent::tool::WebScrapeTool;
    use std::time::Duration;

    #[test]
    fn test_agent_properties() {
        let config = AgentConfig::builder()
            .api_key("test")
            .research_model("gpt-4o-mini")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let tool = Arc::new(
            WebScrapeTool::new(["https://example.gov/a"], Duration::from_secs(5))
                .unwrap_or_else(|_| unreachable!()),
        );
        let agent = ResearchAgent::new(&config, RESEARCH_SYSTEM_PROMPT.to_string(), tool);
        assert_eq!(agent.role(), AgentRole::Research);
        assert_eq!(agent.model(), "gpt-4o-mini");
    }
}
