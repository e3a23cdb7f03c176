//! System prompts and template builders for agents.
//!
//! Prompts bind each agent's identity at process start: its role, its
//! source discipline, and the explicit-absence sentinel. Template builders
//! format user messages with the query and tool-fetched reference text.

use std::path::Path;

use super::finding::NO_FINDINGS_SENTINEL;

/// System prompt for the information (document-search) agent.
pub const INFORMATION_SYSTEM_PROMPT: &str = r"You are the Medishield Information Provider, a professional document extraction expert for Singapore's MediShield Life scheme. You are good at following instructions.

You will receive a citizen's query and passages from the official MediShield Life information booklet. Your job is to extract every piece of information from those passages that is relevant to the query.

## Rules

- Use ONLY the passages provided. The data you collect MUST ONLY contain information from the booklet passages. Do not add, infer, or invent anything.
- Present the extracted information in a clear, structured format, such as lists or tables, to enhance readability.
- If the passages contain nothing relevant to the query, reply with exactly NO_FINDINGS and nothing else.
- Do not answer the citizen directly; a customer service officer will compose the reply from your extraction.";

/// System prompt for the research (web) agent.
pub const RESEARCH_SYSTEM_PROMPT: &str = r"You are the Medisave Researcher, an expert in navigating and extracting relevant information from Singapore CPF MediSave reference pages, including the scheme overview, eligibility, benefits, where MediSave can be used, and the application process. You are good at following instructions.

You will receive a citizen's query and text scraped from the official CPF MediSave pages. Extract a structured list of the relevant information.

## Rules

- Use ONLY the page text provided. The data you collect MUST ONLY contain information from these CPF MediSave pages. Do not add, infer, or invent anything.
- Present the result as a structured list for the customer service officer to work from.
- If the pages contain nothing relevant to the query, reply with exactly NO_FINDINGS and nothing else.";

/// Greeting that opens every composed answer.
pub const GREETING: &str = "Fellow Citizen, thank you for your enquiry.";

/// Fixed health tips; every composed answer closes with one.
pub const HEALTH_TIPS: &[&str] = &[
    "Health tip: regular health screenings help catch conditions early, when they are easiest to treat.",
    "Health tip: staying active for 150 minutes a week keeps both your body and your healthcare costs healthier.",
    "Health tip: keeping your vaccinations up to date is one of the simplest ways to protect yourself and your family.",
    "Health tip: a balanced diet with less salt and sugar goes a long way towards avoiding chronic illness.",
    "Health tip: do review your healthcare coverage yearly so it keeps pace with your needs.",
];

/// Assistant banner that seeds the conversation log at session start.
pub const WELCOME_MESSAGE: &str =
    "How can I help you navigate your healthcare planning today? Your well-being is our priority!";

/// Header shown above the composed answer in an interactive session.
pub const RESULT_HEADER: &str = "Thanks for waiting. Here is the information you requested.";

/// Default prompt directory under user config.
const DEFAULT_PROMPT_DIR: &str = ".config/medidesk-rs/prompts";

/// Filename for the information agent prompt template.
const INFORMATION_FILENAME: &str = "information.md";
/// Filename for the research agent prompt template.
const RESEARCH_FILENAME: &str = "research.md";

/// A set of system prompts for the search agents.
///
/// Loaded from external template files when available, falling back to
/// compiled-in defaults. Use [`PromptSet::load`] to resolve the prompt
/// directory from CLI flags, environment variables, or the default path.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// System prompt for the information (document-search) agent.
    pub information: String,
    /// System prompt for the research (web) agent.
    pub research: String,
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument (from `--prompt-dir` CLI flag)
    /// 2. `MEDIDESK_PROMPT_DIR` environment variable
    /// 3. `~/.config/medidesk-rs/prompts/`
    ///
    /// Each file is loaded independently — a missing file uses its default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(std::path::PathBuf::from)
            .or_else(|| {
                std::env::var("MEDIDESK_PROMPT_DIR")
                    .ok()
                    .map(std::path::PathBuf::from)
            })
            .or_else(|| dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR)));

        let load_file = |filename: &str, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(filename))
                .and_then(|path| std::fs::read_to_string(&path).ok())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            information: load_file(INFORMATION_FILENAME, INFORMATION_SYSTEM_PROMPT),
            research: load_file(RESEARCH_FILENAME, RESEARCH_SYSTEM_PROMPT),
        }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            information: INFORMATION_SYSTEM_PROMPT.to_string(),
            research: RESEARCH_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Writes the compiled-in default prompts to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten — use this for initial scaffolding only.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let templates = [
            (INFORMATION_FILENAME, INFORMATION_SYSTEM_PROMPT),
            (RESEARCH_FILENAME, RESEARCH_SYSTEM_PROMPT),
        ];

        let mut written = Vec::new();
        for (filename, content) in &templates {
            let path = dir.join(filename);
            if !path.exists() {
                std::fs::write(&path, content)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}

/// Builds the user message for a search agent: the query plus the
/// tool-fetched reference text it must extract from.
#[must_use]
pub fn build_extraction_prompt(query: &str, source_name: &str, source_text: &str) -> String {
    format!(
        "<query>{query}</query>\n\n\
         <source name=\"{source_name}\">\n{source_text}\n</source>\n\n\
         Extract every piece of information from the source that is relevant \
         to the query. If nothing is relevant, reply with exactly \
         {NO_FINDINGS_SENTINEL}."
    )
}

/// Picks a health tip deterministically from the query text.
///
/// The answer must be a strict function of its inputs, so the tip is chosen
/// by a stable byte-sum hash rather than randomness.
#[must_use]
pub fn pick_health_tip(query: &str) -> &'static str {
    let sum: usize = query.bytes().map(usize::from).sum();
    HEALTH_TIPS[sum % HEALTH_TIPS.len()]
}
