//! Amazon Elasticsearch Service domains

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_elasticsearch::Client;
use aws_sdk_elasticsearch::types::ElasticsearchDomainStatus;
use futures_util::TryFutureExt;

use crate::audit::config::DEFAULT_TIMEOUT;
use crate::audit::types::{DomainDescriptor, ResourceFamily};
use crate::error::ProviderError;
use crate::providers::{ResourceFetcher, with_deadline};

pub struct ElasticsearchFetcher {
    client: Client,
    timeout: Duration,
}

impl ElasticsearchFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Deadline for each request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_conf(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

#[async_trait]
impl ResourceFetcher for ElasticsearchFetcher {
    type Resource = DomainDescriptor;

    fn family(&self) -> ResourceFamily {
        ResourceFamily::Elasticsearch
    }

    async fn list_resource_names(&self) -> Result<Vec<String>, ProviderError> {
        // ListDomainNames is not paginated; one response holds every domain.
        let request = self.client.list_domain_names();
        let output =
            with_deadline(self.timeout, request.send().map_err(ProviderError::from_sdk)).await?;

        let names: Vec<String> = output
            .domain_names()
            .iter()
            .filter_map(|d| d.domain_name().map(str::to_string))
            .collect();
        log::info!("All Elasticsearch domains: {:?}", names);

        Ok(names)
    }

    async fn describe_resource(&self, name: &str) -> Result<DomainDescriptor, ProviderError> {
        let request = self.client.describe_elasticsearch_domain().domain_name(name);
        let call = request.send().map_err(|err| {
            let missing = err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception());
            if missing {
                ProviderError::NotFound(name.to_string())
            } else {
                ProviderError::from_sdk(err)
            }
        });
        let output = with_deadline(self.timeout, call).await?;

        let status = output.domain_status().ok_or_else(|| {
            ProviderError::MalformedResponse(format!("no domain status for {}", name))
        })?;

        descriptor_from_status(name, status)
    }
}

fn descriptor_from_status(
    name: &str,
    status: &ElasticsearchDomainStatus,
) -> Result<DomainDescriptor, ProviderError> {
    let cluster = status.elasticsearch_cluster_config().ok_or_else(|| {
        ProviderError::MalformedResponse(format!("no cluster config for {}", name))
    })?;

    build_descriptor(
        name,
        cluster.instance_type().map(|t| t.as_str()),
        cluster.dedicated_master_count(),
    )
}

fn build_descriptor(
    name: &str,
    instance_type: Option<&str>,
    dedicated_master_count: Option<i32>,
) -> Result<DomainDescriptor, ProviderError> {
    let instance_type = instance_type.ok_or_else(|| {
        ProviderError::MalformedResponse(format!("no instance type for {}", name))
    })?;

    Ok(DomainDescriptor {
        name: name.to_string(),
        instance_type: instance_type.to_string(),
        dedicated_master_count,
    })
}
