//! Output formatters for audit results.
//!
//! - Text - One line per finding, `<resource> - <message>` (default)
//! - JSON - Machine-readable report

pub mod json;
pub mod text;

use clap::ValueEnum;

use crate::audit::runner::{AuditReport, FamilyOutcome};

/// Output format for audit results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Whether each family can be printed as soon as it completes.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Text)
    }
}

/// Format one family's outcome.
pub fn format_family(outcome: &FamilyOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text::format_family(outcome),
        OutputFormat::Json => json::format_family(outcome).to_string(),
    }
}

/// Format a whole report.
pub fn format_report(report: &AuditReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text::format(report),
        OutputFormat::Json => json::format(report),
    }
}
