//! Event stream for observing agent activity in real time.
//!
//! Every agent emits a Start event when it begins, zero or more Action
//! events as its tools and model calls run, and exactly one End event
//! carrying its result. Delivery is synchronous-before-return: an event
//! reaches every subscribed sink before the emitting operation returns, so
//! an observer sees genuine progress, not a replay after the fact.
//!
//! Subscribers are registered once at session start. Any number of sinks may
//! observe the bus; the bus also records the ordered per-turn trace, which
//! is the full observable history of a turn.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::core::AgentRole;

/// Lifecycle phase of an agent event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPhase {
    /// The agent began its task (payload echoes the query).
    Start,
    /// An intermediate action (tool invocation, model call).
    Action,
    /// The agent finished (payload carries its findings or answer).
    End,
}

/// A single observable event from an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Lifecycle phase.
    pub phase: EventPhase,
    /// Which agent emitted the event.
    pub role: AgentRole,
    /// Event text: the query, an action description, or the result.
    pub payload: String,
}

impl Event {
    /// Creates a Start event.
    #[must_use]
    pub fn start(role: AgentRole, payload: impl Into<String>) -> Self {
        Self {
            phase: EventPhase::Start,
            role,
            payload: payload.into(),
        }
    }

    /// Creates an Action event.
    #[must_use]
    pub fn action(role: AgentRole, payload: impl Into<String>) -> Self {
        Self {
            phase: EventPhase::Action,
            role,
            payload: payload.into(),
        }
    }

    /// Creates an End event.
    #[must_use]
    pub fn end(role: AgentRole, payload: impl Into<String>) -> Self {
        Self {
            phase: EventPhase::End,
            role,
            payload: payload.into(),
        }
    }
}

/// Observer of the event stream.
///
/// `on_event` is called synchronously from the emitting agent's execution
/// path; implementations should return quickly.
pub trait EventSink: Send + Sync {
    /// Handles one event. Called in strict emission order.
    fn on_event(&self, event: &Event);
}

/// Observer list plus per-turn trace recorder.
///
/// Sinks are registered before the session starts handling queries and are
/// never removed. The trace is cleared at the start of each turn and holds
/// the turn's events in emission order.
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Arc<dyn EventSink>>,
    trace: Mutex<Vec<Event>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sink. Call before the session starts handling queries.
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Emits an event: delivers it to every sink, then appends it to the
    /// current turn's trace. Returns only after all sinks have seen it.
    pub fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.on_event(&event);
        }
        self.trace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Clears the trace for a new turn.
    pub fn begin_turn(&self) {
        self.trace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns a snapshot of the current turn's trace, in emission order.
    #[must_use]
    pub fn trace(&self) -> Vec<Event> {
        self.trace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("sinks", &self.sinks.len())
            .field("trace_len", &self.trace().len())
            .finish()
    }
}
