//! Turn orchestration: the conditional-routing state machine.
//!
//! One turn walks a strictly forward-progressing machine:
//!
//! ```text
//! Init → GateCheck → {InfoSearch | SkipInfo} → {WebSearch | SkipWeb}
//!      → Aggregate → Compose → Done
//! ```
//!
//! The keyword gate decides whether the document-search path runs at all;
//! a successful document search short-circuits web research; the composer
//! receives exactly one findings value. No state is re-entered, so a turn
//! makes at most two agent invocations plus the composer. The conversation
//! log is appended only once the machine reaches `Done`.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::client::create_provider;
use super::composer::ResponseComposer;
use super::config::AgentConfig;
use super::event::{EventBus, EventSink};
use super::finding::{Findings, SearchOutcome, TurnReport};
use super::information::InformationAgent;
use super::prompt::{PromptSet, WELCOME_MESSAGE};
use super::provider::LlmProvider;
use super::research::ResearchAgent;
use super::tool::{DocumentSearchTool, ReferenceTool, WebScrapeTool};
use crate::core::{AgentRole, ConversationLog, KeywordSet, evaluate};
use crate::error::AgentError;

/// States of the per-turn routing machine.
///
/// The machine never revisits a state within a turn; transitions only move
/// rightward through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Query received, per-turn findings slots reset.
    Init,
    /// Keyword gate evaluated against the query.
    GateCheck,
    /// Information agent searching the reference document.
    InfoSearch,
    /// Document search skipped: the gate did not match.
    SkipInfo,
    /// Research agent searching the whitelisted reference pages.
    WebSearch,
    /// Web research skipped: the document search already found content.
    SkipWeb,
    /// Selecting the single findings value for the composer.
    Aggregate,
    /// Composer building the user-facing answer.
    Compose,
    /// Terminal: answer and event trace handed to the caller.
    Done,
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::GateCheck => "gate_check",
            Self::InfoSearch => "info_search",
            Self::SkipInfo => "skip_info",
            Self::WebSearch => "web_search",
            Self::SkipWeb => "skip_web",
            Self::Aggregate => "aggregate",
            Self::Compose => "compose",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Owns the turn pipeline: gate, search agents, composer, event bus, and
/// the session's conversation log.
///
/// Turns are handled one at a time; [`Orchestrator::handle_query`] takes
/// `&mut self`, so no two turns can interleave on the same session.
pub struct Orchestrator {
    provider: Box<dyn LlmProvider>,
    keywords: KeywordSet,
    information: InformationAgent,
    research: ResearchAgent,
    composer: ResponseComposer,
    bus: EventBus,
    log: ConversationLog,
}

impl Orchestrator {
    /// Creates an orchestrator from configuration, wiring up the default
    /// document-search and web-scrape tools.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unsupported or the web-scrape
    /// tool's HTTP client cannot be built.
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        let prompts = PromptSet::load(config.prompt_dir.as_deref());
        let provider = create_provider(config)?;
        let document_tool: Arc<dyn ReferenceTool> =
            Arc::new(DocumentSearchTool::new(config.document_path.clone()));
        let web_tool: Arc<dyn ReferenceTool> = Arc::new(
            WebScrapeTool::new(config.reference_urls.clone(), config.timeout).map_err(|e| {
                AgentError::Orchestration {
                    message: format!("failed to build web scrape tool: {e}"),
                }
            })?,
        );
        Ok(Self::with_parts(
            config,
            &prompts,
            provider,
            document_tool,
            web_tool,
        ))
    }

    /// Creates an orchestrator with an explicit provider and tools.
    ///
    /// This is the injection seam: tests substitute scripted providers and
    /// canned tools here without touching the routing logic.
    #[must_use]
    pub fn with_parts(
        config: &AgentConfig,
        prompts: &PromptSet,
        provider: Box<dyn LlmProvider>,
        document_tool: Arc<dyn ReferenceTool>,
        web_tool: Arc<dyn ReferenceTool>,
    ) -> Self {
        Self {
            provider,
            keywords: KeywordSet::default_vocabulary(),
            information: InformationAgent::new(config, prompts.information.clone(), document_tool),
            research: ResearchAgent::new(config, prompts.research.clone(), web_tool),
            composer: ResponseComposer::new(),
            bus: EventBus::new(),
            log: ConversationLog::with_welcome(WELCOME_MESSAGE),
        }
    }

    /// Registers an event sink. Call before the first query; sinks observe
    /// every event of every subsequent turn.
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        self.bus.subscribe(sink);
    }

    /// The session's conversation log.
    #[must_use]
    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Handles one query end to end and returns the turn's report.
    ///
    /// Never fails: search-stage errors degrade to
    /// [`Findings::Nothing`] inside the agents, and an all-empty turn
    /// surfaces as the fallback answer. Events are delivered to sinks
    /// synchronously as each stage runs, before this method returns.
    pub async fn handle_query(&mut self, query: &str) -> TurnReport {
        let started = Instant::now();

        // Init: fresh trace, empty findings slots.
        self.enter(TurnState::Init);
        self.bus.begin_turn();
        let mut info_outcome: Option<SearchOutcome> = None;
        let mut web_outcome: Option<SearchOutcome> = None;

        // GateCheck
        self.enter(TurnState::GateCheck);
        let gate_matched = evaluate(query, &self.keywords);

        // InfoSearch | SkipInfo
        if gate_matched {
            self.enter(TurnState::InfoSearch);
            info_outcome = Some(
                self.information
                    .search(&*self.provider, &self.bus, query)
                    .await,
            );
        } else {
            self.enter(TurnState::SkipInfo);
        }
        let short_circuited = info_outcome
            .as_ref()
            .is_some_and(|o| !o.findings.is_nothing());

        // WebSearch | SkipWeb: skipped only when the document search
        // already produced findings.
        if short_circuited {
            self.enter(TurnState::SkipWeb);
        } else {
            self.enter(TurnState::WebSearch);
            web_outcome = Some(self.research.search(&*self.provider, &self.bus, query).await);
        }

        // Aggregate: exactly one findings value reaches the composer;
        // the information agent's findings take precedence.
        self.enter(TurnState::Aggregate);
        let (findings, source) = match (&info_outcome, &web_outcome) {
            (Some(info), _) if !info.findings.is_nothing() => {
                (info.findings.clone(), Some(AgentRole::Information))
            }
            (_, Some(web)) if !web.findings.is_nothing() => {
                (web.findings.clone(), Some(AgentRole::Research))
            }
            _ => (Findings::Nothing, None),
        };

        // Compose
        self.enter(TurnState::Compose);
        let answer = self.composer.compose(&self.bus, query, &findings);

        // Done: only now does the turn touch the conversation log.
        self.enter(TurnState::Done);
        self.log.push_user(query);
        self.log.push_assistant(&answer.text);

        let total_tokens = info_outcome.as_ref().map_or(0, |o| o.tokens)
            + web_outcome.as_ref().map_or(0, |o| o.tokens);
        let report = TurnReport {
            answer,
            source,
            gate_matched,
            information_invoked: info_outcome.is_some(),
            research_invoked: web_outcome.is_some(),
            short_circuited,
            events: self.bus.trace(),
            total_tokens,
            elapsed: started.elapsed(),
        };
        info!(
            gate_matched,
            short_circuited,
            source = report.source.map(|r| r.as_str()),
            total_tokens,
            elapsed_secs = report.elapsed.as_secs_f64(),
            "turn complete"
        );
        report
    }

    fn enter(&self, state: TurnState) {
        debug!(state = %state, "turn state");
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.provider.name())
            .field("log_len", &self.log.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::composer::FALLBACK_ANSWER;
    use crate::agent::event::EventPhase;
    use crate::agent::message::{ChatRequest, ChatResponse, TokenUsage};
    use crate::agent::prompt::GREETING;
    use crate::core::LogRole;
    use crate::error::ToolError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that answers from a script keyed on the system prompt.
    struct ScriptedProvider {
        information_reply: String,
        research_reply: String,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(information_reply: &str, research_reply: &str) -> Self {
            Self {
                information_reply: information_reply.to_string(),
                research_reply: research_reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let system = request
                .messages
                .first()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            let content = if system.contains("Information Provider") {
                self.information_reply.clone()
            } else {
                self.research_reply.clone()
            };
            Ok(ChatResponse {
                content,
                usage: TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                },
                finish_reason: Some("stop".to_string()),
            })
        }
    }

    /// Tool that returns canned text (or a failure) and counts invocations.
    struct CannedTool {
        name: &'static str,
        reply: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    impl CannedTool {
        fn found(name: &'static str, text: &str) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let tool = Arc::new(Self {
                name,
                reply: Some(text.to_string()),
                calls: Arc::clone(&calls),
            });
            (tool, calls)
        }

        fn failing(name: &'static str) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let tool = Arc::new(Self {
                name,
                reply: None,
                calls: Arc::clone(&calls),
            });
            (tool, calls)
        }
    }

    #[async_trait]
    impl ReferenceTool for CannedTool {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn invoke(&self, _query: &str) -> Result<String, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or(ToolError::NotFound)
        }
    }

    fn test_config() -> AgentConfig {
        AgentConfig::builder()
            .api_key("test-key")
            .build()
            .unwrap_or_else(|_| unreachable!())
    }

    fn build(
        provider: ScriptedProvider,
        document_tool: Arc<CannedTool>,
        web_tool: Arc<CannedTool>,
    ) -> Orchestrator {
        Orchestrator::with_parts(
            &test_config(),
            &PromptSet::defaults(),
            Box::new(provider),
            document_tool,
            web_tool,
        )
    }

    #[tokio::test]
    async fn test_keyword_query_short_circuits_web_research() {
        let (doc, doc_calls) = CannedTool::found("doc", "Claims are filed by the hospital.");
        let (web, web_calls) = CannedTool::found("web", "unrelated page text");
        let provider = ScriptedProvider::new("- Claims are filed by the hospital.", "unused");
        let mut orchestrator = build(provider, doc, web);

        let report = orchestrator
            .handle_query("What is the claim process for Medishield?")
            .await;

        assert!(report.gate_matched);
        assert!(report.information_invoked);
        assert!(!report.research_invoked);
        assert!(report.short_circuited);
        assert_eq!(report.source, Some(AgentRole::Information));
        assert_eq!(doc_calls.load(Ordering::SeqCst), 1);
        assert_eq!(web_calls.load(Ordering::SeqCst), 0);
        assert!(report.answer.text.contains("Claims are filed by the hospital."));
        assert!(report.answer.text.starts_with(GREETING));
    }

    #[tokio::test]
    async fn test_gate_miss_skips_document_search() {
        let (doc, doc_calls) = CannedTool::found("doc", "booklet text");
        let (web, web_calls) = CannedTool::found("web", "MediSave can be used for vaccinations.");
        let provider =
            ScriptedProvider::new("unused", "- MediSave can be used for vaccinations.");
        let mut orchestrator = build(provider, doc, web);

        let report = orchestrator.handle_query("Tell me about the weather").await;

        assert!(!report.gate_matched);
        assert!(!report.information_invoked);
        assert!(report.research_invoked);
        assert!(!report.short_circuited);
        assert_eq!(report.source, Some(AgentRole::Research));
        assert_eq!(doc_calls.load(Ordering::SeqCst), 0);
        assert_eq!(web_calls.load(Ordering::SeqCst), 1);
        assert!(report.answer.text.contains("vaccinations"));
    }

    #[tokio::test]
    async fn test_empty_document_findings_fall_through_to_web() {
        let (doc, _) = CannedTool::found("doc", "booklet text without the answer");
        let (web, web_calls) = CannedTool::found("web", "page text with the answer");
        let provider = ScriptedProvider::new("NO_FINDINGS", "- The answer from the web pages.");
        let mut orchestrator = build(provider, doc, web);

        let report = orchestrator
            .handle_query("What are the premium subsidies?")
            .await;

        assert!(report.gate_matched);
        assert!(report.information_invoked);
        assert!(report.research_invoked);
        assert!(!report.short_circuited);
        assert_eq!(report.source, Some(AgentRole::Research));
        assert_eq!(web_calls.load(Ordering::SeqCst), 1);
        assert!(report.answer.text.contains("answer from the web pages"));
    }

    #[tokio::test]
    async fn test_gate_miss_with_empty_research_yields_exact_fallback() {
        let (doc, doc_calls) = CannedTool::found("doc", "booklet text");
        let (web, web_calls) = CannedTool::found("web", "page text");
        let provider = ScriptedProvider::new("unused", "NO_FINDINGS");
        let mut orchestrator = build(provider, doc, web);

        let report = orchestrator.handle_query("hello").await;

        assert!(!report.gate_matched);
        assert!(!report.information_invoked);
        assert!(report.research_invoked);
        assert_eq!(doc_calls.load(Ordering::SeqCst), 0);
        assert_eq!(web_calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.source, None);
        assert!(report.answer.fallback);
        assert_eq!(report.answer.text, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_all_empty_yields_exact_fallback() {
        let (doc, _) = CannedTool::found("doc", "booklet text");
        let (web, _) = CannedTool::found("web", "page text");
        let provider = ScriptedProvider::new("NO_FINDINGS", "NO_FINDINGS");
        let mut orchestrator = build(provider, doc, web);

        let report = orchestrator.handle_query("claim details please").await;

        assert_eq!(report.source, None);
        assert!(report.answer.fallback);
        assert_eq!(report.answer.text, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_tool_failures_degrade_to_fallback() {
        let (doc, doc_calls) = CannedTool::failing("doc");
        let (web, web_calls) = CannedTool::failing("web");
        let provider = ScriptedProvider::new("unused", "unused");
        let mut orchestrator = build(provider, doc, web);

        let report = orchestrator.handle_query("hospital ward charges").await;

        // Both tools were tried, neither model call happened, and the user
        // sees the fallback, never an error.
        assert_eq!(doc_calls.load(Ordering::SeqCst), 1);
        assert_eq!(web_calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.total_tokens, 0);
        assert_eq!(report.answer.text, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_event_trace_has_one_start_and_end_per_invoked_agent() {
        let (doc, _) = CannedTool::found("doc", "booklet text");
        let (web, _) = CannedTool::found("web", "page text");
        let provider = ScriptedProvider::new("NO_FINDINGS", "- findings");
        let mut orchestrator = build(provider, doc, web);

        let report = orchestrator.handle_query("coverage question").await;

        for role in [
            AgentRole::Information,
            AgentRole::Research,
            AgentRole::Composer,
        ] {
            let starts = report
                .events
                .iter()
                .filter(|e| e.role == role && e.phase == EventPhase::Start)
                .count();
            let ends = report
                .events
                .iter()
                .filter(|e| e.role == role && e.phase == EventPhase::End)
                .count();
            assert_eq!(starts, 1, "{role} start count");
            assert_eq!(ends, 1, "{role} end count");
        }

        // Agents do not interleave: information's End precedes research's
        // Start, research's End precedes the composer's Start.
        let position = |role, phase| {
            report
                .events
                .iter()
                .position(|e| e.role == role && e.phase == phase)
        };
        assert!(
            position(AgentRole::Information, EventPhase::End)
                < position(AgentRole::Research, EventPhase::Start)
        );
        assert!(
            position(AgentRole::Research, EventPhase::End)
                < position(AgentRole::Composer, EventPhase::Start)
        );
    }

    #[tokio::test]
    async fn test_skipped_agents_emit_no_events() {
        let (doc, _) = CannedTool::found("doc", "booklet text");
        let (web, _) = CannedTool::found("web", "page text");
        let provider = ScriptedProvider::new("- findings from the booklet", "unused");
        let mut orchestrator = build(provider, doc, web);

        let report = orchestrator.handle_query("claim question").await;

        assert!(
            report
                .events
                .iter()
                .all(|e| e.role != AgentRole::Research)
        );
    }

    #[tokio::test]
    async fn test_log_appended_only_after_turn_completes() {
        let (doc, _) = CannedTool::found("doc", "booklet text");
        let (web, _) = CannedTool::found("web", "page text");
        let provider = ScriptedProvider::new("- findings", "unused");
        let mut orchestrator = build(provider, doc, web);

        // Welcome banner only, before any turn
        assert_eq!(orchestrator.log().len(), 1);

        let report = orchestrator.handle_query("claim question").await;

        assert_eq!(orchestrator.log().len(), 3);
        let last = orchestrator.log().last().unwrap_or_else(|| unreachable!());
        assert_eq!(last.role, LogRole::Assistant);
        assert_eq!(last.content, report.answer.text);
    }

    #[tokio::test]
    async fn test_token_accounting_sums_model_calls() {
        let (doc, _) = CannedTool::found("doc", "booklet text");
        let (web, _) = CannedTool::found("web", "page text");
        let provider = ScriptedProvider::new("NO_FINDINGS", "- findings");
        let mut orchestrator = build(provider, doc, web);

        let report = orchestrator.handle_query("coverage question").await;

        // Two model calls at 15 tokens each
        assert_eq!(report.total_tokens, 30);
    }

    #[tokio::test]
    async fn test_consecutive_turns_reset_the_trace() {
        let (doc, _) = CannedTool::found("doc", "booklet text");
        let (web, _) = CannedTool::found("web", "page text");
        let provider = ScriptedProvider::new("- findings", "- findings");
        let mut orchestrator = build(provider, doc, web);

        let first = orchestrator.handle_query("claim question").await;
        let second = orchestrator.handle_query("another claim question").await;

        // The second report's trace holds only the second turn's events.
        assert!(second.events.len() <= first.events.len() + 1);
        assert!(
            second
                .events
                .iter()
                .filter(|e| e.phase == EventPhase::Start && e.role == AgentRole::Information)
                .all(|e| e.payload.contains("another"))
        );
    }
}
