//! S3001: public-access-block
//!
//! Every bucket should have a public access block configuration with all four
//! protections enabled. Applies regardless of environment.

use crate::audit::rules::{CheckContext, Rule, SimpleRule, make_finding};
use crate::audit::types::{BucketAccess, Finding, RuleCategory, Severity};

const CODE: &str = "S3001";
const NAME: &str = "public-access-block";
const DESCRIPTION: &str = "Buckets should block and ignore public ACLs and policies.";
const URL: &str = "https://docs.aws.amazon.com/AmazonS3/latest/userguide/access-control-block-public-access.html";

pub fn rule() -> impl Rule<BucketAccess> {
    SimpleRule::new(
        CODE,
        NAME,
        Severity::Error,
        RuleCategory::Security,
        DESCRIPTION,
        URL,
        check,
    )
}

fn check(ctx: &CheckContext<'_, BucketAccess>) -> Vec<Finding> {
    let config = match ctx.resource {
        BucketAccess::Configured(config) => config,
        BucketAccess::NotConfigured { .. } => {
            return vec![finding(ctx, "does not have public access block configuration")];
        }
    };

    let checks = [
        (config.block_public_acls, "does not block public ACLs"),
        (config.block_public_policy, "does not block public policy"),
        (config.ignore_public_acls, "does not ignore public ACLs"),
        (config.restrict_public_buckets, "does not restrict public buckets"),
    ];

    checks
        .into_iter()
        .filter(|(enabled, _)| !enabled)
        .map(|(_, message)| finding(ctx, message))
        .collect()
}

fn finding(ctx: &CheckContext<'_, BucketAccess>, message: &str) -> Finding {
    make_finding(
        ctx,
        CODE,
        NAME,
        Severity::Error,
        RuleCategory::Security,
        message,
    )
}
