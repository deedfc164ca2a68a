//! ES002: dedicated-master-nodes
//!
//! Production domains should run three dedicated master nodes. Fewer than
//! three cannot survive the loss of a master, and an even count risks a split
//! brain.

use crate::audit::rules::{CheckContext, Rule, SimpleRule, make_finding};
use crate::audit::types::{DomainDescriptor, Finding, RuleCategory, Severity};

const CODE: &str = "ES002";
const NAME: &str = "dedicated-master-nodes";
const DESCRIPTION: &str = "Production domains should use an odd number (at least 3) of dedicated master nodes.";
const URL: &str = "https://docs.aws.amazon.com/elasticsearch-service/latest/developerguide/es-managedomains-dedicatedmasternodes.html";

pub fn rule() -> impl Rule<DomainDescriptor> {
    SimpleRule::new(
        CODE,
        NAME,
        Severity::Warning,
        RuleCategory::Reliability,
        DESCRIPTION,
        URL,
        check,
    )
}

fn check(ctx: &CheckContext<'_, DomainDescriptor>) -> Vec<Finding> {
    let mut findings = Vec::new();
    if !ctx.production_like {
        return findings;
    }

    let Some(count) = ctx.resource.dedicated_master_count else {
        findings.push(finding(ctx, "has no dedicated master node"));
        return findings;
    };

    if count < 3 {
        findings.push(finding(ctx, "has less than 3 dedicated master nodes"));
    }
    // Zero is not reported as even.
    if count > 0 && count % 2 == 0 {
        findings.push(finding(ctx, "has an even number of dedicated master nodes"));
    }

    findings
}

fn finding(ctx: &CheckContext<'_, DomainDescriptor>, message: &str) -> Finding {
    make_finding(
        ctx,
        CODE,
        NAME,
        Severity::Warning,
        RuleCategory::Reliability,
        message,
    )
}
