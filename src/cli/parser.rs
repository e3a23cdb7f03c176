//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MediDesk: citizen Q&A for MediShield Life and MediSave.
///
/// Routes each enquiry through a keyword gate, a document-search agent
/// over the MediShield Life booklet, and a web-research agent over the
/// official CPF MediSave pages, then composes a policy-constrained reply.
#[derive(Parser, Debug)]
#[command(name = "medidesk-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the local MediShield Life booklet text file.
    ///
    /// Defaults to `reference/medishield-life-booklet.txt` in the current
    /// directory.
    #[arg(short, long, env = "MEDIDESK_DOCUMENT")]
    pub document: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a single enquiry and exit.
    #[command(after_help = r#"Examples:
  medidesk-rs ask "What is the claim process for Medishield?"
  medidesk-rs ask "Can MediSave pay for outpatient scans?" --quiet
  medidesk-rs --format json ask "premium subsidies" | jq '.answer.text'
"#)]
    Ask {
        /// The enquiry text.
        question: String,

        /// Model for the document-search agent.
        #[arg(long)]
        information_model: Option<String>,

        /// Model for the web-research agent.
        #[arg(long)]
        research_model: Option<String>,

        /// Directory containing prompt template files.
        #[arg(long)]
        prompt_dir: Option<PathBuf>,

        /// Suppress the live event stream; print only the final answer.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Start an interactive enquiry session.
    ///
    /// Reads enquiries from stdin one line at a time; `exit` or `quit`
    /// ends the session.
    Chat {
        /// Model for the document-search agent.
        #[arg(long)]
        information_model: Option<String>,

        /// Model for the web-research agent.
        #[arg(long)]
        research_model: Option<String>,

        /// Directory containing prompt template files.
        #[arg(long)]
        prompt_dir: Option<PathBuf>,

        /// Suppress the live event stream; print only final answers.
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the keyword vocabulary that gates document search.
    Keywords,

    /// Prompt template operations (init).
    #[command(subcommand)]
    Prompts(PromptCommands),
}

/// Prompt template subcommands.
#[derive(Subcommand, Debug)]
pub enum PromptCommands {
    /// Write default prompt templates for customization.
    ///
    /// Existing files are not overwritten.
    Init {
        /// Target directory (default: ~/.config/medidesk-rs/prompts/).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
