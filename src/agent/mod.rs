//! Agent pipeline for citizen healthcare enquiries.
//!
//! Routes each query through a small pipeline of specialized agents and
//! composes a single policy-constrained answer. Uses a pluggable provider
//! abstraction backed by OpenAI-compatible APIs.
//!
//! # Architecture
//!
//! ```text
//! Citizen query → Orchestrator
//!   ├── KeywordGate (routing decision, no I/O)
//!   ├── InformationAgent (searches the MediShield Life booklet)
//!   │   └── findings found? → skip web research
//!   ├── ResearchAgent (scrapes the whitelisted CPF MediSave pages)
//!   ├── Aggregate (exactly one findings value survives)
//!   └── ResponseComposer → greeting + findings + health tip,
//!       or the literal fallback when nothing was found
//! ```
//!
//! Every agent emits Start/Action/End events on the [`EventBus`] as it
//! runs; delivery is synchronous, so observers see genuine progress.

pub mod client;
pub mod composer;
pub mod config;
pub mod event;
pub mod finding;
pub mod information;
pub mod message;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod research;
pub mod tool;
pub mod traits;

// Re-export key types
pub use composer::{FALLBACK_ANSWER, ResponseComposer};
pub use config::{AgentConfig, DEFAULT_REFERENCE_URLS};
pub use event::{Event, EventBus, EventPhase, EventSink};
pub use finding::{Answer, Findings, SearchOutcome, TurnReport};
pub use information::InformationAgent;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use orchestrator::{Orchestrator, TurnState};
pub use prompt::PromptSet;
pub use provider::LlmProvider;
pub use research::ResearchAgent;
pub use tool::{DocumentSearchTool, ReferenceTool, WebScrapeTool};
pub use traits::{Agent, AgentResponse, run_search};
