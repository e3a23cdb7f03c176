//! Session conversation log.
//!
//! Append-only, accumulates across turns for the lifetime of the session.
//! The log is owned by the session host and appended to only at the
//! orchestrator boundary, after a turn completes — agents never write to it.

use serde::{Deserialize, Serialize};

/// Who authored a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRole {
    /// The citizen asking questions.
    User,
    /// The help-desk (final composed answers and the welcome banner).
    Assistant,
}

/// One entry in the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Author of the entry.
    pub role: LogRole,
    /// Entry text.
    pub content: String,
}

/// Ordered, append-only record of the session's user/assistant exchanges.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<LogEntry>,
}

impl ConversationLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a log seeded with an assistant welcome message.
    #[must_use]
    pub fn with_welcome(welcome: &str) -> Self {
        let mut log = Self::new();
        log.push_assistant(welcome);
        log
    }

    /// Appends a user entry.
    pub fn push_user(&mut self, content: &str) {
        self.entries.push(LogEntry {
            role: LogRole::User,
            content: content.to_string(),
        });
    }

    /// Appends an assistant entry.
    pub fn push_assistant(&mut self, content: &str) {
        self.entries.push(LogEntry {
            role: LogRole::Assistant,
            content: content.to_string(),
        });
    }

    /// Returns the entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the log has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the most recent entry, if any.
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_starts_empty() {
        let log = ConversationLog::new();
        assert!(log.is_empty());
        assert!(log.last().is_none());
    }

    #[test]
    fn test_with_welcome_seeds_assistant_entry() {
        let log = ConversationLog::with_welcome("How can I help?");
        assert_eq!(log.len(), 1);
        let entry = log.last().map(|e| (e.role, e.content.as_str()));
        assert_eq!(entry, Some((LogRole::Assistant, "How can I help?")));
    }

    #[test]
    fn test_entries_preserve_order() {
        let mut log = ConversationLog::new();
        log.push_user("first question");
        log.push_assistant("first answer");
        log.push_user("second question");
        let roles: Vec<LogRole> = log.entries().iter().map(|e| e.role).collect();
        assert_eq!(
            roles,
            vec![LogRole::User, LogRole::Assistant, LogRole::User]
        );
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&LogRole::Assistant).unwrap_or_default();
        assert_eq!(json, "\"assistant\"");
    }
}
