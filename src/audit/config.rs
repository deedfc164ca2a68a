//! Configuration for the audit engine.
//!
//! Builder-style options consumed by the `Runner`:
//! - Environment classification (patterns, `ignore_non_prod`)
//! - Rule selection (disabled rule codes)
//! - Provider call deadline and per-family concurrency

use std::time::Duration;

use crate::audit::environment::{DEFAULT_PRODUCTION_PATTERNS, EnvironmentClassifier};
use crate::audit::types::RuleCode;
use crate::error::Result;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Main configuration for an audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Name patterns marking a resource as production-like.
    pub production_patterns: Vec<String>,
    /// When false, every resource is treated as production-like.
    pub ignore_non_prod: bool,
    /// Rule codes that are never evaluated.
    pub disabled_rules: Vec<String>,
    /// Deadline for each provider call.
    pub timeout: Duration,
    /// Resources of one family evaluated at once.
    pub concurrency: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            production_patterns: DEFAULT_PRODUCTION_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            ignore_non_prod: true,
            disabled_rules: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            concurrency: 1,
        }
    }
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the production patterns.
    pub fn with_production_patterns(mut self, patterns: Vec<String>) -> Self {
        self.production_patterns = patterns;
        self
    }

    pub fn with_ignore_non_prod(mut self, ignore_non_prod: bool) -> Self {
        self.ignore_non_prod = ignore_non_prod;
        self
    }

    /// Disable a rule by code.
    pub fn disable_rule(mut self, code: impl Into<String>) -> Self {
        self.disabled_rules.push(code.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the per-family concurrency (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Check if a rule is disabled (case-insensitive).
    pub fn is_rule_disabled(&self, code: &RuleCode) -> bool {
        self.disabled_rules
            .iter()
            .any(|c| c.eq_ignore_ascii_case(code.as_str()))
    }

    /// Compile the production patterns.
    pub fn classifier(&self) -> Result<EnvironmentClassifier> {
        EnvironmentClassifier::new(&self.production_patterns)
    }
}
