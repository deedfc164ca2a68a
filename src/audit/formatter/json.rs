//! JSON output formatter.

use serde_json::{Value, json};

use crate::audit::runner::{AuditReport, FamilyOutcome};

/// Format a report as pretty-printed JSON.
pub fn format(report: &AuditReport) -> String {
    let value = json!({
        "families": report.families.iter().map(format_family).collect::<Vec<_>>(),
        "summary": {
            "findings": report.finding_count(),
            "errors": report.error_count(),
        }
    });

    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

/// JSON value for one family.
pub fn format_family(outcome: &FamilyOutcome) -> Value {
    match &outcome.result {
        Ok(family) => json!({
            "family": outcome.family,
            "error": Value::Null,
            "resources": family.resources.iter().map(|r| match &r.result {
                Ok(findings) => json!({
                    "name": r.resource_name,
                    "findings": findings,
                    "error": Value::Null,
                }),
                Err(err) => json!({
                    "name": r.resource_name,
                    "findings": [],
                    "error": err.to_string(),
                }),
            }).collect::<Vec<_>>(),
        }),
        Err(err) => json!({
            "family": outcome.family,
            "error": err.to_string(),
            "resources": [],
        }),
    }
}
