//! Data types for agent findings and turn results.
//!
//! [`Findings`] is the contract between the search agents and the composer:
//! either structured text extracted from a reference source, or an explicit
//! "nothing relevant found" signal. Absence is always explicit — a failed
//! tool or model call degrades to [`Findings::Nothing`], never to an error
//! the user sees.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::AgentRole;

use super::event::Event;

/// Event payload used when an agent ends with no findings.
pub const NOTHING_FOUND: &str = "nothing relevant found";

/// Sentinel the search agents are instructed to reply with when the
/// reference source contains nothing relevant to the query.
pub const NO_FINDINGS_SENTINEL: &str = "NO_FINDINGS";

/// Result of a search agent's work: extracted text or explicit absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Findings {
    /// Structured findings extracted from the reference source.
    Found(String),
    /// The agent completed its search and found nothing relevant.
    Nothing,
}

impl Findings {
    /// Interprets a model response as findings.
    ///
    /// An empty response, or one that *opens* with the
    /// [`NO_FINDINGS_SENTINEL`] (the prompts instruct "reply with exactly
    /// NO_FINDINGS and nothing else", but models sometimes append hedging
    /// text), maps to [`Findings::Nothing`]. Anything else is taken
    /// verbatim — a reply that merely quotes the sentinel mid-text still
    /// counts as findings.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with(NO_FINDINGS_SENTINEL) {
            Self::Nothing
        } else {
            Self::Found(trimmed.to_string())
        }
    }

    /// Returns `true` if nothing relevant was found.
    #[must_use]
    pub const fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// Returns the findings text, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Found(text) => Some(text),
            Self::Nothing => None,
        }
    }

    /// Payload for the emitting agent's End event.
    #[must_use]
    pub fn event_payload(&self) -> &str {
        self.as_text().unwrap_or(NOTHING_FOUND)
    }
}

/// Outcome of one search agent invocation.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The findings (or explicit absence).
    pub findings: Findings,
    /// Tokens consumed by the agent's model call, if one was made.
    pub tokens: u32,
}

impl SearchOutcome {
    /// Outcome for a search that produced nothing without a model call.
    #[must_use]
    pub const fn nothing() -> Self {
        Self {
            findings: Findings::Nothing,
            tokens: 0,
        }
    }
}

/// The user-facing answer for one turn.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Answer text shown to the user.
    pub text: String,
    /// `true` when no stage produced usable findings and the text is the
    /// literal fallback message.
    pub fallback: bool,
}

/// Final result of one turn: the answer plus the full observable trace
/// and routing statistics.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    /// The composed answer.
    pub answer: Answer,
    /// Which agent's findings the answer was built from, if any.
    pub source: Option<AgentRole>,
    /// Whether the keyword gate routed to the document-search path.
    pub gate_matched: bool,
    /// Whether the information agent was invoked.
    pub information_invoked: bool,
    /// Whether the research agent was invoked.
    pub research_invoked: bool,
    /// Whether web research was skipped because the information agent
    /// already produced findings.
    pub short_circuited: bool,
    /// Ordered event trace for the turn.
    pub events: Vec<Event>,
    /// Total tokens consumed by model calls this turn.
    pub total_tokens: u32,
    /// Total elapsed time.
    #[serde(serialize_with = "serialize_duration")]
    pub elapsed: Duration,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_duration<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_f64(d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_is_found() {
        let findings = Findings::parse("- Claims are filed by the hospital.\n- Approval takes 5 days.");
        assert!(!findings.is_nothing());
        assert!(
            findings
                .as_text()
                .is_some_and(|t| t.contains("filed by the hospital"))
        );
    }

    #[test]
    fn test_parse_sentinel_is_nothing() {
        assert!(Findings::parse("NO_FINDINGS").is_nothing());
        assert!(Findings::parse("  NO_FINDINGS  ").is_nothing());
        // Trailing hedging text after the sentinel still counts as absence
        assert!(Findings::parse("NO_FINDINGS - the document does not cover this").is_nothing());
    }

    #[test]
    fn test_parse_quoted_sentinel_keeps_findings() {
        // Real content that happens to mention the sentinel is not dropped
        let findings = Findings::parse(
            "- Claims are filed by the hospital.\n- An earlier search returned NO_FINDINGS.",
        );
        assert!(!findings.is_nothing());
        assert!(
            findings
                .as_text()
                .is_some_and(|t| t.contains("filed by the hospital"))
        );
    }

    #[test]
    fn test_parse_empty_is_nothing() {
        assert!(Findings::parse("").is_nothing());
        assert!(Findings::parse("   \n  ").is_nothing());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let findings = Findings::parse("  some text  \n");
        assert_eq!(findings.as_text(), Some("some text"));
    }

    #[test]
    fn test_event_payload() {
        assert_eq!(Findings::Nothing.event_payload(), NOTHING_FOUND);
        assert_eq!(
            Findings::Found("details".to_string()).event_payload(),
            "details"
        );
    }

    #[test]
    fn test_search_outcome_nothing() {
        let outcome = SearchOutcome::nothing();
        assert!(outcome.findings.is_nothing());
        assert_eq!(outcome.tokens, 0);
    }
}
