//! Output formatting for CLI commands.
//!
//! Text rendering for interactive use, JSON for scripting. The answer body
//! is always printed exactly as composed; formatting only wraps it with
//! headers and turn statistics.

use crate::agent::finding::TurnReport;
use crate::agent::prompt::RESULT_HEADER;
use crate::core::KeywordSet;

/// Maximum characters of an event payload shown in the live stream.
const EVENT_PAYLOAD_PREVIEW: usize = 160;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format string, defaulting to text for unknown values.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Returns `true` for the JSON format.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Renders a turn report as text: header, answer, and a statistics footer.
#[must_use]
pub fn format_report(report: &TurnReport, verbose: bool) -> String {
    let source = report.source.map_or("none", |role| role.as_str());
    let gate = if report.gate_matched {
        "matched"
    } else {
        "missed"
    };
    let mut output = format!("{RESULT_HEADER}\n\n{}\n", report.answer.text);
    output.push_str(&format!(
        "\n---\nSource: {source} | Gate: {gate} | Tokens: {} | Time: {:.1}s",
        report.total_tokens,
        report.elapsed.as_secs_f64()
    ));
    if verbose {
        output.push_str(&format!("\nEvents: {}", report.events.len()));
        for event in &report.events {
            output.push_str(&format!(
                "\n  [{}] {:?}: {}",
                event.role.as_str(),
                event.phase,
                preview(&event.payload)
            ));
        }
    }
    output
}

/// Renders the keyword vocabulary.
#[must_use]
pub fn format_keywords(keywords: &KeywordSet, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = format!("{} gate keywords:\n", keywords.terms().len());
            for term in keywords.terms() {
                output.push_str(&format!("  {term}\n"));
            }
            output
        }
        OutputFormat::Json => serde_json::json!({
            "keywords": keywords.terms(),
            "count": keywords.terms().len(),
        })
        .to_string(),
    }
}

/// Truncates an event payload for single-line display, respecting char
/// boundaries.
#[must_use]
pub fn preview(payload: &str) -> String {
    let single_line = payload.replace('\n', " ");
    if single_line.chars().count() <= EVENT_PAYLOAD_PREVIEW {
        single_line
    } else {
        let truncated: String = single_line.chars().take(EVENT_PAYLOAD_PREVIEW).collect();
        format!("{truncated}…")
    }
}
