//! Audit orchestration.
//!
//! The `Runner` enumerates every registered resource family, describes each
//! resource and applies the family's rules in declared order. A failure to
//! describe one resource is recorded against that resource only; a failure to
//! list a family ends that family's pass and is surfaced in its outcome.

use std::future::Future;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};

use crate::audit::config::AuditConfig;
use crate::audit::environment::EnvironmentClassifier;
use crate::audit::rules::{CheckContext, Rule};
use crate::audit::types::{Finding, ResourceFamily};
use crate::error::{AuditError, ProviderError, Result};
use crate::providers::{self, ResourceFetcher};

/// Findings (or the error) for one resource.
#[derive(Debug)]
pub struct ResourceOutcome {
    pub resource_name: String,
    pub result: Result<Vec<Finding>>,
}

/// Everything found for one family whose listing succeeded.
#[derive(Debug)]
pub struct FamilyReport {
    pub family: ResourceFamily,
    pub resources: Vec<ResourceOutcome>,
}

/// Result of one family's pass.
#[derive(Debug)]
pub struct FamilyOutcome {
    pub family: ResourceFamily,
    pub result: Result<FamilyReport>,
}

/// Result of a whole run, in family registration order.
#[derive(Debug, Default)]
pub struct AuditReport {
    pub families: Vec<FamilyOutcome>,
}

impl AuditReport {
    /// All findings across families.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.families
            .iter()
            .filter_map(|f| f.result.as_ref().ok())
            .flat_map(|r| r.resources.iter())
            .filter_map(|r| r.result.as_ref().ok())
            .flatten()
    }

    pub fn finding_count(&self) -> usize {
        self.findings().count()
    }

    /// Listing failures plus per-resource failures.
    pub fn error_count(&self) -> usize {
        self.families
            .iter()
            .map(|f| match &f.result {
                Ok(report) => report.resources.iter().filter(|r| r.result.is_err()).count(),
                Err(_) => 1,
            })
            .sum()
    }

    pub fn has_findings(&self) -> bool {
        self.findings().next().is_some()
    }
}

/// One resource family ready to be audited.
#[async_trait]
pub trait FamilyCheck: Send + Sync {
    fn family(&self) -> ResourceFamily;

    async fn run(&self, runner: &Runner) -> Result<FamilyReport>;
}

/// A fetcher paired with the rules for its resources.
pub struct FamilyAudit<F: ResourceFetcher> {
    fetcher: F,
    rules: Vec<Box<dyn Rule<F::Resource>>>,
}

impl<F: ResourceFetcher> FamilyAudit<F> {
    pub fn new(fetcher: F, rules: Vec<Box<dyn Rule<F::Resource>>>) -> Self {
        Self { fetcher, rules }
    }

    async fn audit_resource(
        &self,
        runner: &Runner,
        rules: &[&dyn Rule<F::Resource>],
        name: String,
    ) -> ResourceOutcome {
        let production_like = runner.is_production_like(&name);
        log::debug!("Describing {} (production-like: {})", name, production_like);

        let result = match runner
            .with_deadline(self.fetcher.describe_resource(&name))
            .await
        {
            Ok(resource) => {
                let ctx = CheckContext::new(&name, &resource, production_like);
                Ok(rules.iter().flat_map(|rule| rule.check(&ctx)).collect())
            }
            Err(err) => {
                log::debug!("{} - {}", name, err);
                Err(AuditError::from(err))
            }
        };

        ResourceOutcome {
            resource_name: name,
            result,
        }
    }
}

#[async_trait]
impl<F> FamilyCheck for FamilyAudit<F>
where
    F: ResourceFetcher + 'static,
{
    fn family(&self) -> ResourceFamily {
        self.fetcher.family()
    }

    async fn run(&self, runner: &Runner) -> Result<FamilyReport> {
        let family = self.fetcher.family();
        // Fetchers bound each page themselves, so a long listing is not cut off.
        let names = self.fetcher.list_resource_names().await?;
        log::debug!("{} {} resources to check", names.len(), family.as_str());

        let rules: Vec<&dyn Rule<F::Resource>> = self
            .rules
            .iter()
            .filter(|rule| !runner.config().is_rule_disabled(rule.code()))
            .map(|rule| &**rule)
            .collect();

        let pending: Vec<_> = names
            .into_iter()
            .map(|name| self.audit_resource(runner, &rules, name))
            .collect();
        let resources = stream::iter(pending)
            .buffered(runner.config().concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(FamilyReport { family, resources })
    }
}

/// Runs the registered family checks.
pub struct Runner {
    config: AuditConfig,
    classifier: EnvironmentClassifier,
    checks: Vec<Box<dyn FamilyCheck>>,
}

impl Runner {
    /// Create a runner, compiling the configured production patterns.
    pub fn new(config: AuditConfig) -> Result<Self> {
        let classifier = config.classifier()?;
        Ok(Self {
            config,
            classifier,
            checks: Vec::new(),
        })
    }

    /// Register a family; families run in registration order.
    pub fn register<F>(&mut self, fetcher: F, rules: Vec<Box<dyn Rule<F::Resource>>>)
    where
        F: ResourceFetcher + 'static,
    {
        self.checks.push(Box::new(FamilyAudit::new(fetcher, rules)));
    }

    pub fn with_family<F>(mut self, fetcher: F, rules: Vec<Box<dyn Rule<F::Resource>>>) -> Self
    where
        F: ResourceFetcher + 'static,
    {
        self.register(fetcher, rules);
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Whether production-sensitive rules apply to `name`.
    pub fn is_production_like(&self, name: &str) -> bool {
        !self.config.ignore_non_prod || self.classifier.is_production_like(name)
    }

    /// Bound a provider call by the configured deadline.
    pub async fn with_deadline<T, Fut>(&self, call: Fut) -> std::result::Result<T, ProviderError>
    where
        Fut: Future<Output = std::result::Result<T, ProviderError>>,
    {
        providers::with_deadline(self.config.timeout, call).await
    }

    /// Run one family, propagating a listing failure.
    pub async fn run_family(&self, check: &dyn FamilyCheck) -> Result<FamilyReport> {
        log::info!("Checking {}...", check.family());
        check.run(self).await
    }

    pub async fn run_all_checks(&self) -> AuditReport {
        self.run_all_checks_with(|_| {}).await
    }

    /// Run every family, handing each outcome to `on_family` as soon as it is
    /// complete.
    pub async fn run_all_checks_with<C>(&self, mut on_family: C) -> AuditReport
    where
        C: FnMut(&FamilyOutcome),
    {
        let mut report = AuditReport::default();

        for check in &self.checks {
            let result = self.run_family(&**check).await;
            if let Err(err) = &result {
                log::debug!("{} - {}", check.family(), err);
            }

            let outcome = FamilyOutcome {
                family: check.family(),
                result,
            };
            on_family(&outcome);
            report.families.push(outcome);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::rules::{bucket_rules, domain_rules};
    use crate::audit::types::{BucketAccess, DomainDescriptor, PublicAccessConfig};
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeDomains {
        list_fails: bool,
        domains: Vec<DomainDescriptor>,
        broken: Vec<String>,
        slow: Vec<String>,
    }

    #[async_trait]
    impl ResourceFetcher for FakeDomains {
        type Resource = DomainDescriptor;

        fn family(&self) -> ResourceFamily {
            ResourceFamily::Elasticsearch
        }

        async fn list_resource_names(&self) -> std::result::Result<Vec<String>, ProviderError> {
            if self.list_fails {
                return Err(ProviderError::Api {
                    code: "UnrecognizedClientException".to_string(),
                    message: "The security token included in the request is invalid".to_string(),
                });
            }
            Ok(self.domains.iter().map(|d| d.name.clone()).collect())
        }

        async fn describe_resource(
            &self,
            name: &str,
        ) -> std::result::Result<DomainDescriptor, ProviderError> {
            if self.broken.iter().any(|b| b == name) {
                return Err(ProviderError::NotFound(name.to_string()));
            }
            if self.slow.iter().any(|s| s == name) {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(self
                .domains
                .iter()
                .find(|d| d.name == name)
                .cloned()
                .expect("fake domain exists"))
        }
    }

    struct FakeBuckets {
        buckets: HashMap<String, Option<PublicAccessConfig>>,
        order: Vec<String>,
    }

    #[async_trait]
    impl ResourceFetcher for FakeBuckets {
        type Resource = BucketAccess;

        fn family(&self) -> ResourceFamily {
            ResourceFamily::S3
        }

        async fn list_resource_names(&self) -> std::result::Result<Vec<String>, ProviderError> {
            Ok(self.order.clone())
        }

        async fn describe_resource(
            &self,
            name: &str,
        ) -> std::result::Result<BucketAccess, ProviderError> {
            match self.buckets.get(name) {
                Some(Some(config)) => Ok(BucketAccess::Configured(config.clone())),
                Some(None) => Ok(BucketAccess::NotConfigured {
                    bucket_name: name.to_string(),
                }),
                None => Err(ProviderError::Api {
                    code: "AccessDenied".to_string(),
                    message: "Access Denied".to_string(),
                }),
            }
        }
    }

    /// Lists its domains one page at a time, each page bounded on its own.
    struct PagedDomains {
        pages: Vec<Vec<DomainDescriptor>>,
        page_delay: Duration,
        page_timeout: Duration,
    }

    #[async_trait]
    impl ResourceFetcher for PagedDomains {
        type Resource = DomainDescriptor;

        fn family(&self) -> ResourceFamily {
            ResourceFamily::Elasticsearch
        }

        async fn list_resource_names(&self) -> std::result::Result<Vec<String>, ProviderError> {
            let mut names = Vec::new();
            for page in &self.pages {
                let page_names = providers::with_deadline(self.page_timeout, async {
                    tokio::time::sleep(self.page_delay).await;
                    Ok(page.iter().map(|d| d.name.clone()).collect::<Vec<_>>())
                })
                .await?;
                names.extend(page_names);
            }
            Ok(names)
        }

        async fn describe_resource(
            &self,
            name: &str,
        ) -> std::result::Result<DomainDescriptor, ProviderError> {
            self.pages
                .iter()
                .flatten()
                .find(|d| d.name == name)
                .cloned()
                .ok_or_else(|| ProviderError::NotFound(name.to_string()))
        }
    }

    fn domain(name: &str, instance_type: &str, masters: Option<i32>) -> DomainDescriptor {
        DomainDescriptor {
            name: name.to_string(),
            instance_type: instance_type.to_string(),
            dedicated_master_count: masters,
        }
    }

    fn messages(outcome: &ResourceOutcome) -> Vec<String> {
        outcome
            .result
            .as_ref()
            .expect("resource succeeded")
            .iter()
            .map(|f| f.message.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_describe_failure_is_isolated() {
        let fetcher = FakeDomains {
            domains: vec![
                domain("a-prod", "t2.small.elasticsearch", Some(3)),
                domain("b-prod", "m5.large.elasticsearch", Some(3)),
                domain("c-prod", "m5.large.elasticsearch", None),
            ],
            broken: vec!["b-prod".to_string()],
            ..Default::default()
        };
        let runner = Runner::new(AuditConfig::default())
            .unwrap()
            .with_family(fetcher, domain_rules());

        let report = runner.run_all_checks().await;
        let family = report.families[0].result.as_ref().unwrap();

        let names: Vec<&str> = family.resources.iter().map(|r| r.resource_name.as_str()).collect();
        assert_eq!(names, vec!["a-prod", "b-prod", "c-prod"]);
        assert_eq!(
            messages(&family.resources[0]),
            vec!["You should not use `t2` instances for production"]
        );
        assert!(matches!(
            family.resources[1].result,
            Err(AuditError::Provider(ProviderError::NotFound(_)))
        ));
        assert_eq!(messages(&family.resources[2]), vec!["has no dedicated master node"]);
        assert_eq!(report.finding_count(), 2);
        assert_eq!(report.error_count(), 1);
    }

    #[tokio::test]
    async fn test_listing_failure_does_not_stop_other_families() {
        let mut buckets = HashMap::new();
        buckets.insert("uploads".to_string(), None);
        let runner = Runner::new(AuditConfig::default())
            .unwrap()
            .with_family(
                FakeDomains {
                    list_fails: true,
                    ..Default::default()
                },
                domain_rules(),
            )
            .with_family(
                FakeBuckets {
                    buckets,
                    order: vec!["uploads".to_string()],
                },
                bucket_rules(),
            );

        let report = runner.run_all_checks().await;
        assert_eq!(report.families.len(), 2);
        assert!(report.families[0].result.is_err());
        let s3 = report.families[1].result.as_ref().unwrap();
        assert_eq!(
            messages(&s3.resources[0]),
            vec!["does not have public access block configuration"]
        );
        assert_eq!(report.error_count(), 1);
    }

    #[tokio::test]
    async fn test_run_family_propagates_listing_failure() {
        let check = FamilyAudit::new(
            FakeDomains {
                list_fails: true,
                ..Default::default()
            },
            domain_rules(),
        );
        let runner = Runner::new(AuditConfig::default()).unwrap();
        let err = runner.run_family(&check).await.unwrap_err();
        assert!(err.to_string().contains("UnrecognizedClientException"));
    }

    #[tokio::test]
    async fn test_bucket_errors_continue_to_next_bucket() {
        let mut buckets = HashMap::new();
        buckets.insert(
            "open".to_string(),
            Some(PublicAccessConfig {
                block_public_acls: false,
                block_public_policy: false,
                ignore_public_acls: false,
                restrict_public_buckets: false,
                bucket_name: "open".to_string(),
            }),
        );
        buckets.insert("closed".to_string(), Some(PublicAccessConfig::fully_blocked("closed")));
        let runner = Runner::new(AuditConfig::default()).unwrap().with_family(
            FakeBuckets {
                buckets,
                order: vec!["open".to_string(), "denied".to_string(), "closed".to_string()],
            },
            bucket_rules(),
        );

        let report = runner.run_all_checks().await;
        let s3 = report.families[0].result.as_ref().unwrap();
        assert_eq!(messages(&s3.resources[0]).len(), 4);
        let err = s3.resources[1].result.as_ref().unwrap_err();
        assert_eq!(err.to_string(), "got AccessDenied error: Access Denied");
        assert!(messages(&s3.resources[2]).is_empty());
    }

    #[tokio::test]
    async fn test_non_production_resources_skip_sensitive_rules() {
        let fetcher = FakeDomains {
            domains: vec![domain("search-staging", "t2.small.elasticsearch", None)],
            ..Default::default()
        };
        let runner = Runner::new(AuditConfig::default())
            .unwrap()
            .with_family(fetcher, domain_rules());

        assert!(!runner.run_all_checks().await.has_findings());
    }

    #[tokio::test]
    async fn test_ignore_non_prod_disabled_checks_everything() {
        let fetcher = FakeDomains {
            domains: vec![domain("search-staging", "t2.small.elasticsearch", None)],
            ..Default::default()
        };
        let runner = Runner::new(AuditConfig::default().with_ignore_non_prod(false))
            .unwrap()
            .with_family(fetcher, domain_rules());

        assert_eq!(runner.run_all_checks().await.finding_count(), 2);
    }

    #[tokio::test]
    async fn test_disabled_rules_are_skipped() {
        let fetcher = FakeDomains {
            domains: vec![domain("search-prod", "t2.small.elasticsearch", None)],
            ..Default::default()
        };
        let runner = Runner::new(AuditConfig::default().disable_rule("ES002"))
            .unwrap()
            .with_family(fetcher, domain_rules());

        let report = runner.run_all_checks().await;
        let codes: Vec<&str> = report.findings().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["ES001"]);
    }

    #[tokio::test]
    async fn test_slow_describe_times_out() {
        let fetcher = FakeDomains {
            domains: vec![
                domain("slow-prod", "m5.large.elasticsearch", Some(3)),
                domain("fast-prod", "m5.large.elasticsearch", Some(2)),
            ],
            slow: vec!["slow-prod".to_string()],
            ..Default::default()
        };
        let config = AuditConfig::default().with_timeout(Duration::from_millis(50));
        let runner = Runner::new(config).unwrap().with_family(fetcher, domain_rules());

        let report = runner.run_all_checks().await;
        let family = report.families[0].result.as_ref().unwrap();
        assert!(matches!(
            family.resources[0].result,
            Err(AuditError::Provider(ProviderError::Timeout(_)))
        ));
        assert_eq!(messages(&family.resources[1]).len(), 2);
    }

    #[tokio::test]
    async fn test_listing_longer_than_one_deadline_completes() {
        let timeout = Duration::from_millis(150);
        let fetcher = PagedDomains {
            pages: (0..4)
                .map(|i| vec![domain(&format!("p{i}-prod"), "m5.large.elasticsearch", Some(3))])
                .collect(),
            page_delay: Duration::from_millis(60),
            page_timeout: timeout,
        };
        let runner = Runner::new(AuditConfig::default().with_timeout(timeout))
            .unwrap()
            .with_family(fetcher, domain_rules());

        let report = runner.run_all_checks().await;
        let family = report.families[0].result.as_ref().unwrap();
        assert_eq!(family.resources.len(), 4);
        assert_eq!(report.error_count(), 0);
    }

    #[tokio::test]
    async fn test_slow_listing_page_times_out() {
        let fetcher = PagedDomains {
            pages: vec![vec![domain("p0-prod", "m5.large.elasticsearch", Some(3))]],
            page_delay: Duration::from_secs(5),
            page_timeout: Duration::from_millis(50),
        };
        let runner = Runner::new(AuditConfig::default())
            .unwrap()
            .with_family(fetcher, domain_rules());

        let report = runner.run_all_checks().await;
        assert!(matches!(
            report.families[0].result,
            Err(AuditError::Provider(ProviderError::Timeout(_)))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_run_keeps_listing_order() {
        let fetcher = FakeDomains {
            domains: (0..10)
                .map(|i| domain(&format!("d{i}-prod"), "t2.small.elasticsearch", Some(3)))
                .collect(),
            ..Default::default()
        };
        let runner = Runner::new(AuditConfig::default().with_concurrency(4))
            .unwrap()
            .with_family(fetcher, domain_rules());

        let report = runner.run_all_checks().await;
        let attributed: Vec<&str> = report.findings().map(|f| f.resource_name.as_str()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("d{i}-prod")).collect();
        assert_eq!(attributed, expected);
    }

    #[tokio::test]
    async fn test_outcomes_are_streamed_per_family() {
        let runner = Runner::new(AuditConfig::default())
            .unwrap()
            .with_family(FakeDomains::default(), domain_rules())
            .with_family(
                FakeBuckets {
                    buckets: HashMap::new(),
                    order: Vec::new(),
                },
                bucket_rules(),
            );

        let mut seen = Vec::new();
        runner
            .run_all_checks_with(|outcome| seen.push(outcome.family))
            .await;
        assert_eq!(seen, vec![ResourceFamily::Elasticsearch, ResourceFamily::S3]);
    }

    #[test]
    fn test_invalid_pattern_rejected_at_construction() {
        let config = AuditConfig::default().with_production_patterns(vec!["(".to_string()]);
        assert!(matches!(
            Runner::new(config),
            Err(AuditError::Classification { .. })
        ));
    }
}
