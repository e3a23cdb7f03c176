//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use std::io::{self, BufRead, Write as IoWrite};
use std::path::Path;
use std::sync::Arc;

use crate::agent::config::AgentConfig;
use crate::agent::event::{Event, EventPhase, EventSink};
use crate::agent::orchestrator::Orchestrator;
use crate::agent::prompt::{PromptSet, WELCOME_MESSAGE};
use crate::cli::output::{OutputFormat, format_keywords, format_report, preview};
use crate::cli::parser::{Cli, Commands, PromptCommands};
use crate::core::KeywordSet;
use crate::error::{CommandError, Result};

/// Parameters shared by the `ask` and `chat` commands.
#[derive(Debug, Clone, Default)]
struct SessionParams<'a> {
    information_model: Option<&'a str>,
    research_model: Option<&'a str>,
    prompt_dir: Option<&'a Path>,
    quiet: bool,
}

/// Executes the CLI command.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Ask {
            question,
            information_model,
            research_model,
            prompt_dir,
            quiet,
        } => {
            let params = SessionParams {
                information_model: information_model.as_deref(),
                research_model: research_model.as_deref(),
                prompt_dir: prompt_dir.as_deref(),
                quiet: *quiet,
            };
            cmd_ask(cli, question, &params, format)
        }
        Commands::Chat {
            information_model,
            research_model,
            prompt_dir,
            quiet,
        } => {
            let params = SessionParams {
                information_model: information_model.as_deref(),
                research_model: research_model.as_deref(),
                prompt_dir: prompt_dir.as_deref(),
                quiet: *quiet,
            };
            cmd_chat(cli, &params, format)
        }
        Commands::Keywords => Ok(format_keywords(&KeywordSet::default_vocabulary(), format)),
        Commands::Prompts(PromptCommands::Init { dir }) => {
            cmd_prompts_init(dir.as_deref(), format)
        }
    }
}

/// Event sink that renders the live agent stream to stdout.
struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn on_event(&self, event: &Event) {
        let line = match event.phase {
            EventPhase::Start => format!("[{}] started: {}", event.role.title(), preview(&event.payload)),
            EventPhase::Action => format!("[{}] {}", event.role.title(), preview(&event.payload)),
            EventPhase::End => format!("[{}] finished", event.role.title()),
        };
        // Stream rendering is best-effort; a closed pipe must not abort the turn.
        let _ = writeln!(io::stdout(), "{line}");
    }
}

fn build_config(cli: &Cli, params: &SessionParams<'_>) -> Result<AgentConfig, CommandError> {
    let mut builder = AgentConfig::builder().from_env();
    if let Some(document) = &cli.document {
        builder = builder.document_path(document.clone());
    }
    if let Some(model) = params.information_model {
        builder = builder.information_model(model);
    }
    if let Some(model) = params.research_model {
        builder = builder.research_model(model);
    }
    if let Some(dir) = params.prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    Ok(builder.build()?)
}

fn build_orchestrator(
    cli: &Cli,
    params: &SessionParams<'_>,
    format: OutputFormat,
) -> Result<Orchestrator, CommandError> {
    let config = build_config(cli, params)?;
    let mut orchestrator = Orchestrator::new(&config)?;
    // The live stream only makes sense for interactive text output.
    if !params.quiet && !format.is_json() {
        orchestrator.subscribe(Arc::new(ConsoleSink));
    }
    Ok(orchestrator)
}

fn cmd_ask(
    cli: &Cli,
    question: &str,
    params: &SessionParams<'_>,
    format: OutputFormat,
) -> Result<String> {
    if question.trim().is_empty() {
        return Err(CommandError::InvalidInput {
            message: "the enquiry text is empty".to_string(),
        });
    }

    let mut orchestrator = build_orchestrator(cli, params, format)?;

    // Create tokio runtime as sync/async bridge
    let rt = tokio::runtime::Runtime::new().map_err(CommandError::Io)?;
    let report = rt.block_on(orchestrator.handle_query(question));

    match format {
        OutputFormat::Text => Ok(format_report(&report, cli.verbose)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).map_err(|e| CommandError::Output {
                message: e.to_string(),
            })
        }
    }
}

fn cmd_chat(cli: &Cli, params: &SessionParams<'_>, format: OutputFormat) -> Result<String> {
    let mut orchestrator = build_orchestrator(cli, params, format)?;
    let rt = tokio::runtime::Runtime::new().map_err(CommandError::Io)?;

    let stdout = io::stdout();
    writeln!(stdout.lock(), "{WELCOME_MESSAGE}\n").map_err(CommandError::Io)?;

    for line in io::stdin().lock().lines() {
        let line = line.map_err(CommandError::Io)?;
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        let report = rt.block_on(orchestrator.handle_query(question));
        let rendered = match format {
            OutputFormat::Text => format_report(&report, cli.verbose),
            OutputFormat::Json => {
                serde_json::to_string_pretty(&report).map_err(|e| CommandError::Output {
                    message: e.to_string(),
                })?
            }
        };
        writeln!(stdout.lock(), "\n{rendered}\n").map_err(CommandError::Io)?;
    }

    Ok(String::new())
}

fn cmd_prompts_init(dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let target_dir = dir
        .map(std::path::PathBuf::from)
        .or_else(PromptSet::default_dir)
        .ok_or_else(|| CommandError::InvalidInput {
            message: "could not determine home directory for default prompt path".to_string(),
        })?;

    let written = PromptSet::write_defaults(&target_dir).map_err(CommandError::Io)?;

    match format {
        OutputFormat::Text => {
            if written.is_empty() {
                Ok(format!(
                    "All prompt templates already exist in: {}\n",
                    target_dir.display()
                ))
            } else {
                let mut output = format!(
                    "Wrote {} prompt template(s) to: {}\n",
                    written.len(),
                    target_dir.display()
                );
                for path in &written {
                    output.push_str(&format!(
                        "  {}\n",
                        path.file_name()
                            .and_then(|n| n.to_str())
                            .unwrap_or("unknown")
                    ));
                }
                output.push_str("\nEdit these files to customize agent system prompts.\n");
                Ok(output)
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "directory": target_dir.to_string_lossy(),
                "written": written
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect::<Vec<_>>(),
                "count": written.len(),
            });
            Ok(json.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn test_keywords_command_lists_vocabulary() {
        let cli = parse(&["medidesk-rs", "keywords"]);
        let output = execute(&cli).unwrap_or_else(|_| unreachable!());
        assert!(output.contains("medishield"));
        assert!(output.contains("claim"));
    }

    #[test]
    fn test_keywords_command_json() {
        let cli = parse(&["medidesk-rs", "--format", "json", "keywords"]);
        let output = execute(&cli).unwrap_or_else(|_| unreachable!());
        let parsed: serde_json::Value =
            serde_json::from_str(&output).unwrap_or_else(|_| unreachable!());
        assert!(parsed["keywords"].is_array());
    }

    #[test]
    fn test_prompts_init_scaffolds_templates() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let dir_arg = dir.path().to_string_lossy().into_owned();
        let cli = parse(&["medidesk-rs", "prompts", "init", "--dir", &dir_arg]);
        let output = execute(&cli).unwrap_or_else(|_| unreachable!());
        assert!(output.contains("Wrote 2 prompt template(s)"));
        assert!(dir.path().join("information.md").exists());
        assert!(dir.path().join("research.md").exists());
    }

    #[test]
    fn test_ask_rejects_blank_question() {
        let cli = parse(&["medidesk-rs", "ask", "   "]);
        let result = execute(&cli);
        assert!(matches!(
            result,
            Err(CommandError::InvalidInput { .. })
        ));
    }
}
