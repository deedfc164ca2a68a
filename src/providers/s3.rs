//! Amazon S3 buckets

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::types::PublicAccessBlockConfiguration;
use futures_util::TryFutureExt;

use crate::audit::config::DEFAULT_TIMEOUT;
use crate::audit::types::{BucketAccess, PublicAccessConfig, ResourceFamily};
use crate::error::ProviderError;
use crate::providers::{ResourceFetcher, with_deadline};

/// Error code S3 answers with when a bucket has no public access block.
pub const NO_SUCH_PUBLIC_ACCESS_BLOCK: &str = "NoSuchPublicAccessBlockConfiguration";

const PAGE_SIZE: i32 = 1000;

pub struct S3Fetcher {
    client: Client,
    timeout: Duration,
}

impl S3Fetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Deadline for each request, including every `ListBuckets` page.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_conf(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

#[async_trait]
impl ResourceFetcher for S3Fetcher {
    type Resource = BucketAccess;

    fn family(&self) -> ResourceFamily {
        ResourceFamily::S3
    }

    async fn list_resource_names(&self) -> Result<Vec<String>, ProviderError> {
        let mut names = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let request = self
                .client
                .list_buckets()
                .max_buckets(PAGE_SIZE)
                .set_continuation_token(continuation_token.take());
            let output =
                with_deadline(self.timeout, request.send().map_err(ProviderError::from_sdk))
                    .await?;

            names.extend(
                output
                    .buckets()
                    .iter()
                    .filter_map(|b| b.name().map(str::to_string)),
            );

            match output.continuation_token() {
                Some(token) if !token.is_empty() => {
                    log::debug!("Fetched {} buckets so far, following continuation token", names.len());
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        log::info!("Found {} S3 buckets", names.len());
        Ok(names)
    }

    async fn describe_resource(&self, name: &str) -> Result<BucketAccess, ProviderError> {
        let request = self.client.get_public_access_block().bucket(name);
        match with_deadline(self.timeout, request.send().map_err(ProviderError::from_sdk)).await {
            Ok(output) => Ok(access_from_config(
                name,
                output.public_access_block_configuration(),
            )),
            Err(err) => access_from_error(name, err),
        }
    }
}

/// A missing configuration is a finding, not a failure.
fn access_from_config(name: &str, config: Option<&PublicAccessBlockConfiguration>) -> BucketAccess {
    match config {
        Some(config) => BucketAccess::Configured(PublicAccessConfig {
            bucket_name: name.to_string(),
            block_public_acls: config.block_public_acls().unwrap_or(false),
            block_public_policy: config.block_public_policy().unwrap_or(false),
            ignore_public_acls: config.ignore_public_acls().unwrap_or(false),
            restrict_public_buckets: config.restrict_public_buckets().unwrap_or(false),
        }),
        None => BucketAccess::NotConfigured {
            bucket_name: name.to_string(),
        },
    }
}

fn access_from_error(name: &str, err: ProviderError) -> Result<BucketAccess, ProviderError> {
    if err.code() == Some(NO_SUCH_PUBLIC_ACCESS_BLOCK) {
        return Ok(BucketAccess::NotConfigured {
            bucket_name: name.to_string(),
        });
    }
    Err(err)
}
