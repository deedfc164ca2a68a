//! Error types for the AWS best-practice checker
//!
//! `ProviderError` covers everything that can go wrong while talking to AWS,
//! `AuditError` is the crate-wide error returned by the public API.

use std::path::PathBuf;
use std::time::Duration;

use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use thiserror::Error;

/// Errors returned by the resource-listing and resource-describing calls
#[derive(Debug, Error)]
pub enum ProviderError {
    /// AWS answered with a modeled error code
    #[error("got {code} error: {message}")]
    Api {
        /// Error code reported by the service (e.g. `AccessDenied`)
        code: String,
        /// Error message reported by the service
        message: String,
    },

    /// The named resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The call did not finish before the caller-supplied deadline
    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Network, credential or dispatch failure without an error code
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered but a required field was missing
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Convert an SDK error into a `ProviderError`.
    ///
    /// Errors carrying an error code become `Api`; everything else (dispatch
    /// failures, SDK-level timeouts, construction failures) becomes `Transport`
    /// with the full error chain rendered.
    pub fn from_sdk<E>(err: E) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        match err.code() {
            Some(code) => Self::Api {
                code: code.to_string(),
                message: err.message().unwrap_or_default().to_string(),
            },
            None => Self::Transport(DisplayErrorContext(&err).to_string()),
        }
    }

    /// Error code reported by AWS, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    ParsingFailed(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A production pattern could not be compiled
    #[error("invalid environment pattern `{pattern}`: {source}")]
    Classification {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, AuditError>;
