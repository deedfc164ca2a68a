use serde::Deserialize;
use std::time::Duration;

use crate::audit::AuditConfig;
use crate::audit::environment::DEFAULT_PRODUCTION_PATTERNS;
use crate::providers::AwsSettings;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audit: AuditSection,
    pub aws: AwsSection,
}

/// Audit configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    /// Resource name patterns (regular expressions, case-insensitive) that
    /// mark a resource as production-like
    pub production_patterns: Vec<String>,
    /// Only apply production rules to production-like resources
    pub ignore_non_prod: bool,
    /// Rule codes to skip (e.g. "ES001")
    pub disabled_rules: Vec<String>,
    /// Resources checked at once per service
    pub concurrency: usize,
    /// Deadline for each AWS call, in seconds
    pub timeout_secs: u64,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            production_patterns: DEFAULT_PRODUCTION_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            ignore_non_prod: true,
            disabled_rules: Vec::new(),
            concurrency: 1,
            timeout_secs: 30,
        }
    }
}

/// AWS connection overrides
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AwsSection {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl Config {
    /// Engine configuration for this file.
    pub fn audit_config(&self) -> AuditConfig {
        let audit = &self.audit;
        let mut config = AuditConfig::new()
            .with_production_patterns(audit.production_patterns.clone())
            .with_ignore_non_prod(audit.ignore_non_prod)
            .with_timeout(Duration::from_secs(audit.timeout_secs))
            .with_concurrency(audit.concurrency);
        for code in &audit.disabled_rules {
            config = config.disable_rule(code.clone());
        }
        config
    }

    pub fn aws_settings(&self) -> AwsSettings {
        AwsSettings {
            region: self.aws.region.clone(),
            profile: self.aws.profile.clone(),
        }
    }
}
