//! Plain text output: a header per service, then one line per finding or error.

use colored::Colorize;

use crate::audit::runner::{AuditReport, FamilyOutcome};

/// Format every family of a report.
pub fn format(report: &AuditReport) -> String {
    report.families.iter().map(format_family).collect()
}

/// Format a single family.
pub fn format_family(outcome: &FamilyOutcome) -> String {
    let mut output = format!("{}\n", format!("Checking {}...", outcome.family).bold());

    let family = match &outcome.result {
        Ok(family) => family,
        Err(err) => {
            output.push_str(&format!("{} - {}\n", outcome.family, err));
            return output;
        }
    };

    for resource in &family.resources {
        match &resource.result {
            Ok(findings) => {
                for finding in findings {
                    output.push_str(&format!("{}\n", finding));
                }
            }
            Err(err) => {
                output.push_str(&format!("{} - {}\n", resource.resource_name, err));
            }
        }
    }

    output
}
