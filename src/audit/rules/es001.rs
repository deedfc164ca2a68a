//! ES001: instance-type
//!
//! Production domains should not run on `t2` or `t3.small` instances; they can
//! become unstable under sustained heavy load. `t3.medium` is acceptable for
//! small production workloads.

use crate::audit::rules::{CheckContext, Rule, SimpleRule, make_finding};
use crate::audit::types::{DomainDescriptor, Finding, RuleCategory, Severity};

const CODE: &str = "ES001";
const NAME: &str = "instance-type";
const DESCRIPTION: &str = "Production domains should not use `t2` or `t3.small` instances.";
const URL: &str = "https://docs.aws.amazon.com/elasticsearch-service/latest/developerguide/aes-bp.html";

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

    let instance_type = &ctx.resource.instance_type;

    if instance_type.contains("t2") {
        findings.push(make_finding(
            ctx,
            CODE,
            NAME,
            Severity::Warning,
            RuleCategory::Reliability,
            "You should not use `t2` instances for production",
        ));
    }

    if instance_type.contains("t3.small") {
        findings.push(make_finding(
            ctx,
            CODE,
            NAME,
            Severity::Warning,
            RuleCategory::Reliability,
            "You should not use `t3.small` instances for production",
        ));
    }

    findings
}
