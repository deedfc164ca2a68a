//! # aws-bp-check
//!
//! A command-line auditing tool that inspects AWS resources against a small
//! set of best practices and prints advisory findings. It never changes
//! anything in the account.
//!
//! ## Features
//!
//! - **Elasticsearch Service**: instance types and dedicated master nodes of
//!   production-like domains
//! - **S3**: public access block configuration of every bucket
//! - **Fault isolation**: a failure on one resource never stops the others
//! - **Multiple Formats**: plain text or JSON output
//!
//! See [`audit`] for the engine and [`providers`] for the AWS adapters.

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod providers;

// Re-export commonly used types and functions
pub use audit::{AuditConfig, AuditReport, Finding, Runner};
pub use error::{AuditError, ProviderError, Result};
pub use handlers::*;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
