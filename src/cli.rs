use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::audit::{OutputFormat, ResourceFamily};

#[derive(Parser, Debug)]
#[command(name = "aws-bp-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check AWS resources against best practices")]
#[command(long_about = "Inspects Elasticsearch Service domains and S3 buckets in the current AWS account and region and prints advisory findings, one per line. Nothing in the account is changed.")]
pub struct Cli {
    /// Apply production-only rules to production-like resources only; pass
    /// `--ignore-non-prod=false` to apply them to every resource
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub ignore_non_prod: Option<bool>,

    /// Only check these services
    #[arg(long, value_enum, value_delimiter = ',')]
    pub only: Vec<Service>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// AWS region (defaults to the standard AWS resolution chain)
    #[arg(long)]
    pub region: Option<String>,

    /// AWS shared config profile
    #[arg(long)]
    pub profile: Option<String>,

    /// Deadline for each AWS call, in seconds
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Number of resources checked at once per service
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..=64))]
    pub concurrency: Option<u64>,

    /// Exit with status 1 when any finding is reported
    #[arg(long)]
    pub fail_on_findings: bool,

    /// Print the available rules and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all logging
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Service {
    Elasticsearch,
    S3,
}

impl From<Service> for ResourceFamily {
    fn from(service: Service) -> Self {
        match service {
            Service::Elasticsearch => ResourceFamily::Elasticsearch,
            Service::S3 => ResourceFamily::S3,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }

    /// Whether a service was selected (all are, when `--only` is absent).
    pub fn includes(&self, family: ResourceFamily) -> bool {
        self.only.is_empty() || self.only.iter().any(|s| ResourceFamily::from(*s) == family)
    }
}
