//! CLI layer for MediDesk.
//!
//! Provides the command-line interface using clap, with commands for
//! asking single enquiries, running an interactive session, and managing
//! prompt templates.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands, PromptCommands};
