//! MediDesk: citizen Q&A for Singapore's MediShield Life and MediSave
//! schemes.
//!
//! Each enquiry is routed through a keyword gate, a document-search agent
//! over the official MediShield Life booklet, and a web-research agent over
//! the whitelisted CPF MediSave pages. A response composer turns whichever
//! findings exist into a single policy-constrained answer; when nothing is
//! found, the user gets a fixed fallback message rather than an invented
//! one. Agents stream Start/Action/End events to observers as they run.
//!
//! The [`agent::Orchestrator`] is the single entry point:
//!
//! ```no_run
//! use medidesk_rs::agent::{AgentConfig, Orchestrator};
//!
//! # async fn example() -> Result<(), medidesk_rs::error::CommandError> {
//! let config = AgentConfig::from_env()?;
//! let mut orchestrator = Orchestrator::new(&config)?;
//! let report = orchestrator.handle_query("What does MediShield cover?").await;
//! println!("{}", report.answer.text);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod error;

pub use error::{AgentError, CommandError, Result, ToolError};
