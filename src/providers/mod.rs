//! AWS resource fetchers
//!
//! Each resource family implements [`ResourceFetcher`]: enumerate the names
//! visible to the caller's credentials, then describe one resource on demand.
//! Clients are built from one shared [`SdkConfig`] and handed to the fetchers,
//! so tests can substitute fakes for the trait.

pub mod elasticsearch;
pub mod s3;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::audit::types::ResourceFamily;
use crate::error::ProviderError;

pub use elasticsearch::ElasticsearchFetcher;
pub use s3::S3Fetcher;

/// Lists and describes the resources of one family.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Snapshot produced by [`describe_resource`](Self::describe_resource).
    type Resource: Send + Sync + 'static;

    fn family(&self) -> ResourceFamily;

    /// All resource names, following pagination to completion.
    ///
    /// Implementations bound each page request on their own; the runner does
    /// not put a deadline around the whole listing.
    async fn list_resource_names(&self) -> Result<Vec<String>, ProviderError>;

    async fn describe_resource(&self, name: &str) -> Result<Self::Resource, ProviderError>;
}

/// Where to find credentials and which region to talk to.
///
/// Unset fields fall back to the standard AWS resolution chain (environment
/// variables, shared config/credentials files, instance metadata).
#[derive(Debug, Clone, Default)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// Resolve the shared SDK configuration.
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = &settings.profile {
        log::debug!("Using AWS profile {}", profile);
        loader = loader.profile_name(profile);
    }
    if let Some(region) = &settings.region {
        log::debug!("Using AWS region {}", region);
        loader = loader.region(Region::new(region.clone()));
    }
    loader.load().await
}

/// Bound a single AWS call by `timeout`.
pub async fn with_deadline<T, Fut>(timeout: Duration, call: Fut) -> Result<T, ProviderError>
where
    Fut: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_call_within_deadline() {
        let result = with_deadline(Duration::from_secs(1), async { Ok::<_, ProviderError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_call_past_deadline() {
        let result = with_deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ProviderError>(())
        })
        .await;
        assert!(matches!(result, Err(ProviderError::Timeout(d)) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_call_error_is_passed_through() {
        let result: Result<(), _> = with_deadline(Duration::from_secs(1), async {
            Err(ProviderError::NotFound("assets".to_string()))
        })
        .await;
        assert!(matches!(result, Err(ProviderError::NotFound(_))));
    }
}
