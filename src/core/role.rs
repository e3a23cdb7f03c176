//! Agent role identifiers.
//!
//! Roles are fixed at process start: each agent's identity, system prompt,
//! and toolset are bound once and never change mid-session.

use serde::{Deserialize, Serialize};

/// Identity of an agent in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Document-search agent over the fixed reference booklet.
    Information,
    /// Web-research agent over the whitelisted reference pages.
    Research,
    /// Customer-service agent that composes the user-facing answer.
    Composer,
}

impl AgentRole {
    /// Short machine-readable name, used in logs and event payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Information => "information",
            Self::Research => "research",
            Self::Composer => "composer",
        }
    }

    /// Human-facing role title, shown when rendering events in a session.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Information => "Medishield Information Provider",
            Self::Research => "Medisave Researcher",
            Self::Composer => "Customer Service Officer",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(AgentRole::Information.as_str(), "information");
        assert_eq!(AgentRole::Research.as_str(), "research");
        assert_eq!(AgentRole::Composer.as_str(), "composer");
    }

    #[test]
    fn test_role_titles() {
        assert_eq!(
            AgentRole::Information.title(),
            "Medishield Information Provider"
        );
        assert_eq!(AgentRole::Composer.title(), "Customer Service Officer");
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&AgentRole::Research).unwrap_or_default();
        assert_eq!(json, "\"research\"");
    }

    #[test]
    fn test_role_display() {
        assert_eq!(format!("{}", AgentRole::Information), "information");
    }
}
