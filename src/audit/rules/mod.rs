//! Rule system for the audit engine.
//!
//! Provides the infrastructure for defining and running best-practice rules
//! against fetched AWS resources:
//! - `Rule<R>` trait for all rules over a resource snapshot `R`
//! - `SimpleRule` for stateless checks built from a function
//! - `domain_rules` / `bucket_rules` registries in evaluation order

use std::marker::PhantomData;

use crate::audit::types::{
    BucketAccess, DomainDescriptor, Finding, ResourceFamily, RuleCategory, RuleCode, RuleMeta,
    Severity,
};

pub mod es001;
pub mod es002;
pub mod s3001;

/// Everything a rule gets to look at for one resource.
#[derive(Debug)]
pub struct CheckContext<'a, R> {
    /// The resource name findings are attributed to.
    pub name: &'a str,
    /// The fetched resource snapshot.
    pub resource: &'a R,
    /// Whether the resource is treated as production-like.
    pub production_like: bool,
}

impl<'a, R> CheckContext<'a, R> {
    pub fn new(name: &'a str, resource: &'a R, production_like: bool) -> Self {
        Self {
            name,
            resource,
            production_like,
        }
    }
}

/// A rule that can check one kind of resource.
pub trait Rule<R>: Send + Sync {
    /// Get the rule code (e.g., "ES001").
    fn code(&self) -> &RuleCode;

    /// Get the human-readable rule name (e.g., "instance-type").
    fn name(&self) -> &str;

    fn severity(&self) -> Severity;

    fn category(&self) -> RuleCategory;

    /// Get the rule metadata (description, URL).
    fn meta(&self) -> &RuleMeta;

    /// Check the resource and return any findings.
    fn check(&self, context: &CheckContext<'_, R>) -> Vec<Finding>;
}

/// Base implementation for a stateless rule.
pub struct SimpleRule<R, F>
where
    F: Fn(&CheckContext<'_, R>) -> Vec<Finding> + Send + Sync,
{
    code: RuleCode,
    name: String,
    severity: Severity,
    category: RuleCategory,
    meta: RuleMeta,
    check_fn: F,
    _resource: PhantomData<fn(&R)>,
}

impl<R, F> SimpleRule<R, F>
where
    F: Fn(&CheckContext<'_, R>) -> Vec<Finding> + Send + Sync,
{
    pub fn new(
        code: impl Into<RuleCode>,
        name: impl Into<String>,
        severity: Severity,
        category: RuleCategory,
        description: impl Into<String>,
        url: impl Into<String>,
        check_fn: F,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            severity,
            category,
            meta: RuleMeta::new(description, url),
            check_fn,
            _resource: PhantomData,
        }
    }
}

impl<R, F> Rule<R> for SimpleRule<R, F>
where
    F: Fn(&CheckContext<'_, R>) -> Vec<Finding> + Send + Sync,
{
    fn code(&self) -> &RuleCode {
        &self.code
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn category(&self) -> RuleCategory {
        self.category
    }

    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn check(&self, context: &CheckContext<'_, R>) -> Vec<Finding> {
        (self.check_fn)(context)
    }
}

/// Helper to create a finding for a rule.
pub fn make_finding<R>(
    ctx: &CheckContext<'_, R>,
    code: &str,
    name: &str,
    severity: Severity,
    category: RuleCategory,
    message: impl Into<String>,
) -> Finding {
    Finding::new(ctx.name, message, code, name, severity, category)
}

/// Rules for search-cluster domains, in evaluation order.
pub fn domain_rules() -> Vec<Box<dyn Rule<DomainDescriptor>>> {
    vec![Box::new(es001::rule()), Box::new(es002::rule())]
}

/// Rules for buckets, in evaluation order.
pub fn bucket_rules() -> Vec<Box<dyn Rule<BucketAccess>>> {
    vec![Box::new(s3001::rule())]
}

/// Get rule definitions for documentation.
pub fn rule_definitions() -> Vec<RuleDefinition> {
    let domains = domain_rules();
    let buckets = bucket_rules();

    domains
        .iter()
        .map(|r| RuleDefinition::of(ResourceFamily::Elasticsearch, &**r))
        .chain(
            buckets
                .iter()
                .map(|r| RuleDefinition::of(ResourceFamily::S3, &**r)),
        )
        .collect()
}

/// Rule definition for documentation/introspection.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    pub family: ResourceFamily,
    pub code: RuleCode,
    pub name: String,
    pub severity: Severity,
    pub category: RuleCategory,
    pub description: String,
    pub url: String,
}

impl RuleDefinition {
    fn of<R>(family: ResourceFamily, rule: &dyn Rule<R>) -> Self {
        Self {
            family,
            code: rule.code().clone(),
            name: rule.name().to_string(),
            severity: rule.severity(),
            category: rule.category(),
            description: rule.meta().description.clone(),
            url: rule.meta().url.clone(),
        }
    }
}
