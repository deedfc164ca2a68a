use std::time::Duration;

use crate::audit::{
    AuditReport, ResourceFamily, Runner, bucket_rules, domain_rules,
    format_family, format_report, rule_definitions,
};
use crate::cli::Cli;
use crate::config::{self, types::Config};
use crate::providers::{ElasticsearchFetcher, S3Fetcher, load_sdk_config};

/// Run every selected check and print the results.
pub async fn handle_check(cli: &Cli) -> crate::Result<AuditReport> {
    let mut file_config = config::load_config(cli.config.as_deref())?;
    apply_overrides(&mut file_config, cli);

    // Patterns are compiled before any AWS call is made.
    let mut runner = Runner::new(file_config.audit_config())?;

    let aws_settings = file_config.aws_settings();
    let sdk_config = load_sdk_config(&aws_settings).await;
    log::info!(
        "Auditing region {}",
        sdk_config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "<unset>".to_string())
    );

    let timeout = runner.config().timeout;
    if cli.includes(ResourceFamily::Elasticsearch) {
        let fetcher = ElasticsearchFetcher::from_conf(&sdk_config).with_timeout(timeout);
        runner.register(fetcher, domain_rules());
    }
    if cli.includes(ResourceFamily::S3) {
        let fetcher = S3Fetcher::from_conf(&sdk_config).with_timeout(timeout);
        runner.register(fetcher, bucket_rules());
    }

    let format = cli.format;
    let report = if format.is_streaming() {
        runner
            .run_all_checks_with(|outcome| print!("{}", format_family(outcome, format)))
            .await
    } else {
        let report = runner.run_all_checks().await;
        println!("{}", format_report(&report, format));
        report
    };

    log::info!(
        "{} findings, {} errors",
        report.finding_count(),
        report.error_count()
    );

    Ok(report)
}

/// Print the available rules.
pub fn handle_list_rules() {
    for def in rule_definitions() {
        println!(
            "{}  {:<24} {:<22} {}",
            def.code,
            def.name,
            def.family.display_name(),
            def.description
        );
    }
}

/// CLI flags take precedence over the config file.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ignore_non_prod) = cli.ignore_non_prod {
        config.audit.ignore_non_prod = ignore_non_prod;
    }
    if let Some(timeout) = cli.timeout_secs {
        config.audit.timeout_secs = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        config.audit.concurrency = concurrency as usize;
    }
    if cli.region.is_some() {
        config.aws.region = cli.region.clone();
    }
    if cli.profile.is_some() {
        config.aws.profile = cli.profile.clone();
    }
    log::debug!(
        "Effective timeout {:?}, concurrency {}",
        Duration::from_secs(config.audit.timeout_secs),
        config.audit.concurrency
    );
}
