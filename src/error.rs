//! Error types for the agent pipeline, tools, and CLI.
//!
//! Error policy (see the orchestrator): tool failures and empty search
//! results are never surfaced to the user as errors — the pipeline degrades
//! to the fallback answer. Errors here cover genuinely unrecoverable
//! conditions: missing credentials, malformed input, transport failures.

use thiserror::Error;

/// Result type for CLI command execution.
pub type Result<T, E = CommandError> = std::result::Result<T, E>;

/// Errors from the agent pipeline.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No API key was configured. Fatal at startup — the pipeline never
    /// accepts a query without a credential.
    #[error("no API key found; set OPENAI_API_KEY or MEDIDESK_API_KEY")]
    ApiKeyMissing,

    /// The configured provider name is not supported.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// The unrecognized provider name.
        name: String,
    },

    /// An API request to the language-model backend failed.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Error description from the SDK or transport.
        message: String,
        /// HTTP status code, if the failure carried one.
        status: Option<u16>,
    },

    /// A language-model call exceeded the per-call timeout.
    #[error("model call timed out after {seconds}s")]
    Timeout {
        /// The timeout that was exceeded.
        seconds: u64,
    },

    /// Pipeline coordination failure (invalid input, setup error).
    #[error("orchestration error: {message}")]
    Orchestration {
        /// Error description.
        message: String,
    },
}

/// Errors from reference tools (document search, web scrape).
///
/// Callers treat every variant identically: a tool that cannot produce
/// usable text yields `Findings::Nothing`, never a crash.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool completed but found no relevant content.
    #[error("no relevant content found")]
    NotFound,

    /// Reading the reference document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a whitelisted reference page failed.
    #[error("fetch failed for {url}: {message}")]
    Fetch {
        /// The whitelisted URL that failed.
        url: String,
        /// Error description from the HTTP client.
        message: String,
    },
}

/// Errors from CLI command execution.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Agent pipeline error.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// I/O error (prompt scaffolding, stdin).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid command-line input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// Output serialization failed.
    #[error("output formatting failed: {message}")]
    Output {
        /// Error description from the serializer.
        message: String,
    },
}
