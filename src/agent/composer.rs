//! Response composer: the customer-service stage.
//!
//! Consumes the single aggregated [`Findings`] value the orchestrator
//! selected and produces the user-facing answer. The anti-fabrication
//! contract is enforced by construction: the composer never sees raw
//! external context, only the pre-filtered findings, and the answer is a
//! pure template over them — a greeting, the findings verbatim, and a
//! closing health tip. No model call is involved, so the answer is a
//! strict, byte-testable function of its inputs.

use super::event::{Event, EventBus};
use super::finding::{Answer, Findings};
use super::prompt::{GREETING, pick_health_tip};
use crate::core::AgentRole;

/// Literal fallback when no stage produced usable findings. Returned
/// byte-for-byte — no paraphrase, no invented content.
pub const FALLBACK_ANSWER: &str = "I'm sorry. I do not have the answer to this enquiry.";

/// Agent that composes the final answer from aggregated findings.
#[derive(Debug, Clone, Default)]
pub struct ResponseComposer;

impl ResponseComposer {
    /// Creates the composer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Composes the user-facing answer.
    ///
    /// `Findings::Nothing` yields the exact [`FALLBACK_ANSWER`] literal.
    /// `Findings::Found(text)` yields greeting + `text` verbatim + a
    /// deterministic health tip, and nothing else. Emits the
    /// Start / Action / End event lifecycle on `bus` before returning.
    #[must_use]
    pub fn compose(&self, bus: &EventBus, query: &str, findings: &Findings) -> Answer {
        let role = AgentRole::Composer;
        bus.emit(Event::start(role, query));

        let answer = match findings {
            Findings::Nothing => {
                bus.emit(Event::action(role, "no findings supplied, using fallback"));
                Answer {
                    text: FALLBACK_ANSWER.to_string(),
                    fallback: true,
                }
            }
            Findings::Found(text) => {
                bus.emit(Event::action(
                    role,
                    format!("formatting findings ({} bytes)", text.len()),
                ));
                Answer {
                    text: format!("{GREETING}\n\n{text}\n\n{}", pick_health_tip(query)),
                    fallback: false,
                }
            }
        };

        bus.emit(Event::end(role, answer.text.clone()));
        answer
    }
}
