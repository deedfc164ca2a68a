//! Best-practice audit engine for AWS resources.
//!
//! Resources are fetched family by family (see [`crate::providers`]), every
//! resource is run through the rules of its family, and the findings are
//! collected into an [`AuditReport`].
//!
//! # Example
//!
//! ```rust,no_run
//! use aws_bp_check::audit::{AuditConfig, Runner, bucket_rules, domain_rules};
//! use aws_bp_check::providers::{AwsSettings, ElasticsearchFetcher, S3Fetcher, load_sdk_config};
//!
//! # async fn run() -> aws_bp_check::Result<()> {
//! let sdk_config = load_sdk_config(&AwsSettings::default()).await;
//! let runner = Runner::new(AuditConfig::default())?
//!     .with_family(ElasticsearchFetcher::from_conf(&sdk_config), domain_rules())
//!     .with_family(S3Fetcher::from_conf(&sdk_config), bucket_rules());
//!
//! for finding in runner.run_all_checks().await.findings() {
//!     println!("{}", finding);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Rules
//!
//! | Code  | Name                   | Applies to          | Description                                   |
//! |-------|------------------------|---------------------|-----------------------------------------------|
//! | ES001 | instance-type          | production domains  | No `t2` or `t3.small` instances               |
//! | ES002 | dedicated-master-nodes | production domains  | At least 3, and an odd number, of masters     |
//! | S3001 | public-access-block    | all buckets         | All four public access protections enabled    |

pub mod config;
pub mod environment;
pub mod formatter;
pub mod rules;
pub mod runner;
pub mod types;

pub use config::AuditConfig;
pub use environment::{DEFAULT_PRODUCTION_PATTERNS, EnvironmentClassifier};
pub use formatter::{OutputFormat, format_family, format_report};
pub use rules::{Rule, RuleDefinition, bucket_rules, domain_rules, rule_definitions};
pub use runner::{AuditReport, FamilyCheck, FamilyOutcome, FamilyReport, ResourceOutcome, Runner};
pub use types::{
    BucketAccess, DomainDescriptor, Finding, PublicAccessConfig, ResourceFamily, RuleCategory,
    RuleCode, Severity,
};
