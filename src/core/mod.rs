//! Core types shared across the agent pipeline and the CLI.
//!
//! These live outside `agent` so the CLI can reason about roles, the
//! keyword gate, and the conversation log without pulling in the
//! provider-backed agent machinery.

pub mod conversation;
pub mod keyword;
pub mod role;

pub use conversation::{ConversationLog, LogEntry, LogRole};
pub use keyword::{DEFAULT_KEYWORDS, KeywordSet, evaluate};
pub use role::AgentRole;
