//! Core types for the audit engine.
//!
//! - `ResourceFamily` - The AWS service a resource belongs to
//! - `DomainDescriptor` / `BucketAccess` - Snapshots fetched from AWS
//! - `RuleCode` - Rule identifiers (e.g., "ES001")
//! - `Finding` - A single advisory produced by a rule

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Severity of a finding.
///
/// Ordered from most severe to least severe: `Error > Warning > Info`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Exposes data or the account
    Error,
    /// Operational risk
    Warning,
    /// Informational suggestion
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Error => 2,
            Self::Warning => 1,
            Self::Info => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Category of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    /// Stability and availability of a service
    Reliability,
    /// Exposure of data to the outside
    Security,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reliability => "reliability",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rule code identifier (e.g., "ES001").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RuleCode(pub String);

impl RuleCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Rule metadata.
#[derive(Debug, Clone)]
pub struct RuleMeta {
    /// What the rule looks for.
    pub description: String,
    /// AWS documentation backing the rule.
    pub url: String,
}

impl RuleMeta {
    pub fn new(description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            url: url.into(),
        }
    }
}

/// The AWS service a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFamily {
    /// Amazon Elasticsearch Service / OpenSearch domains
    Elasticsearch,
    /// Amazon S3 buckets
    S3,
}

impl ResourceFamily {
    /// Human-readable service name used in output headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Elasticsearch => "Elasticsearch Service",
            Self::S3 => "S3",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Elasticsearch => "elasticsearch",
            Self::S3 => "s3",
        }
    }
}

impl fmt::Display for ResourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Snapshot of a search-cluster domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainDescriptor {
    pub name: String,
    pub instance_type: String,
    pub dedicated_master_count: Option<i32>,
}

/// Public access block settings of a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicAccessConfig {
    pub bucket_name: String,
    pub block_public_acls: bool,
    pub block_public_policy: bool,
    pub ignore_public_acls: bool,
    pub restrict_public_buckets: bool,
}

impl PublicAccessConfig {
    /// A configuration with every protection switched on.
    pub fn fully_blocked(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            block_public_acls: true,
            block_public_policy: true,
            ignore_public_acls: true,
            restrict_public_buckets: true,
        }
    }
}

/// What AWS knows about a bucket's public access block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketAccess {
    Configured(PublicAccessConfig),
    /// No public access block exists for the bucket.
    NotConfigured { bucket_name: String },
}

impl BucketAccess {
    pub fn bucket_name(&self) -> &str {
        match self {
            Self::Configured(config) => &config.bucket_name,
            Self::NotConfigured { bucket_name } => bucket_name,
        }
    }
}

/// An advisory produced by a rule for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub resource_name: String,
    pub message: String,
    pub code: RuleCode,
    pub rule_name: String,
    pub severity: Severity,
    pub category: RuleCategory,
}

impl Finding {
    pub fn new(
        resource_name: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<RuleCode>,
        rule_name: impl Into<String>,
        severity: Severity,
        category: RuleCategory,
    ) -> Self {
        Self {
            resource_name: resource_name.into(),
            message: message.into(),
            code: code.into(),
            rule_name: rule_name.into(),
            severity,
            category,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.resource_name, self.message)
    }
}
