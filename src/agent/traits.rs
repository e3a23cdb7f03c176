//! Agent trait definition.
//!
//! Both search agents implement this trait, which gives the orchestrator a
//! uniform interface: a fixed role, model, and system prompt bound at
//! construction, plus a timeout-bounded `execute` against a provider.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::event::{Event, EventBus};
use super::finding::{Findings, NOTHING_FOUND, SearchOutcome};
use super::message::{ChatRequest, ChatResponse, TokenUsage, system_message, user_message};
use super::prompt::build_extraction_prompt;
use super::provider::LlmProvider;
use super::tool::ReferenceTool;
use crate::core::AgentRole;
use crate::error::AgentError;

/// Response from an agent execution.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// The agent's text output.
    pub content: String,
    /// Token usage for this call.
    pub usage: TokenUsage,
    /// Why the model stopped generating (e.g. `"stop"`, `"length"`).
    pub finish_reason: Option<String>,
}

/// Trait implemented by the search agents in the pipeline.
///
/// Agents encapsulate a specific role with a fixed system prompt and model
/// configuration. [`Agent::execute`] runs one blocking model call, bounded
/// by [`Agent::timeout`] so a stuck call cannot stall the turn forever.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The agent's fixed role identity.
    fn role(&self) -> AgentRole;

    /// Model identifier to use for this agent.
    fn model(&self) -> &str;

    /// System prompt that defines the agent's role and behavior.
    fn system_prompt(&self) -> &str;

    /// Sampling temperature (0.0 = deterministic).
    fn temperature(&self) -> f32 {
        0.0
    }

    /// Maximum tokens for the response.
    fn max_tokens(&self) -> u32 {
        2048
    }

    /// Per-call timeout, bounding worst-case turn latency.
    fn timeout(&self) -> Duration {
        Duration::from_secs(120)
    }

    /// Executes the agent with the given user message.
    ///
    /// Builds a [`ChatRequest`] from the agent's configuration, delegates
    /// to the provider, and enforces the per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Timeout`] if the call exceeds the agent's
    /// timeout, or the provider's error on API failures.
    async fn execute(
        &self,
        provider: &dyn LlmProvider,
        user_msg: &str,
    ) -> Result<AgentResponse, AgentError> {
        let request = ChatRequest {
            model: self.model().to_string(),
            messages: vec![system_message(self.system_prompt()), user_message(user_msg)],
            temperature: Some(self.temperature()),
            max_tokens: Some(self.max_tokens()),
        };

        let response: ChatResponse = tokio::time::timeout(self.timeout(), provider.chat(&request))
            .await
            .map_err(|_| AgentError::Timeout {
                seconds: self.timeout().as_secs(),
            })??;

        Ok(AgentResponse {
            content: response.content,
            usage: response.usage,
            finish_reason: response.finish_reason,
        })
    }
}

/// Runs the full search lifecycle for an agent backed by a reference tool.
///
/// Emits the agent's Start event, invokes the tool (one Action event),
/// runs the extraction model call (one Action event), and emits exactly one
/// End event carrying the findings or the nothing-found marker — all before
/// returning. Tool and model failures degrade to
/// [`Findings::Nothing`](super::finding::Findings::Nothing); this function
/// never fails.
pub async fn run_search(
    agent: &dyn Agent,
    provider: &dyn LlmProvider,
    bus: &EventBus,
    tool: &dyn ReferenceTool,
    source_name: &str,
    query: &str,
) -> SearchOutcome {
    let role = agent.role();
    bus.emit(Event::start(role, query));

    let source_text = match tool.invoke(query).await {
        Ok(text) => {
            bus.emit(Event::action(
                role,
                format!(
                    "{}: retrieved {} bytes of reference text",
                    tool.name(),
                    text.len()
                ),
            ));
            text
        }
        Err(error) => {
            // ToolFailure and NotFound are handled identically: degrade,
            // advance the pipeline.
            debug!(agent = role.as_str(), tool = tool.name(), %error, "tool yielded nothing");
            bus.emit(Event::action(role, format!("{}: {error}", tool.name())));
            bus.emit(Event::end(role, NOTHING_FOUND));
            return SearchOutcome::nothing();
        }
    };

    let user_msg = build_extraction_prompt(query, source_name, &source_text);
    match agent.execute(provider, &user_msg).await {
        Ok(response) => {
            bus.emit(Event::action(
                role,
                format!(
                    "model extraction complete ({} tokens)",
                    response.usage.total_tokens
                ),
            ));
            let findings = Findings::parse(&response.content);
            bus.emit(Event::end(role, findings.event_payload().to_string()));
            SearchOutcome {
                findings,
                tokens: response.usage.total_tokens,
            }
        }
        Err(error) => {
            warn!(agent = role.as_str(), %error, "model call failed, treating as no findings");
            bus.emit(Event::end(role, NOTHING_FOUND));
            SearchOutcome::nothing()
        }
    }
}
