// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resolves provider credentials into an ExternalClient for one reconciliation.

use crate::config::Config;
use crate::constants::OPERATOR_NAME;
use crate::error::{Result, TetherError};
use crate::kubernetes::{
    connection_config_to_client, credentials_to_connection_config, resolve_credentials,
    ResolvedCredentials,
};
use crate::provider::external::ExternalClient;
use crate::types::condition::set_condition;
use crate::types::{Condition, KubernetesResource, ProviderConfig};
use kube::{
    api::{Patch, PatchParams},
    Api, Client, Config as KConfig, Resource, ResourceExt,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Builds a remote client from connection parameters
pub type ClientFactory = Arc<dyn Fn(KConfig) -> Result<Client> + Send + Sync>;

/// How a failure to mark the ProviderConfig available affects a connect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AvailabilityPolicy {
    /// The status is written before the client is built and a failure fails the connect
    Blocking,
    /// The status is written after the client is built and a failure is only logged.
    /// This is the default: ProviderConfig bookkeeping never stops managed
    /// resources from reconciling. Set `PROVIDER_STATUS_BEST_EFFORT=false` for
    /// the blocking write.
    #[default]
    BestEffort,
}

pub struct Connector {
    client: Client,
    new_client: ClientFactory,
    availability: AvailabilityPolicy,
}

impl Connector {
    pub fn new(client: Client, config: &Config) -> Self {
        let availability = if config.provider_status_best_effort {
            AvailabilityPolicy::BestEffort
        } else {
            AvailabilityPolicy::Blocking
        };

        Self {
            client,
            new_client: Arc::new(connection_config_to_client),
            availability,
        }
    }

    /// Replace the remote client construction
    pub fn with_client_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(KConfig) -> Result<Client> + Send + Sync + 'static,
    {
        self.new_client = Arc::new(factory);
        self
    }

    pub fn with_availability_policy(mut self, availability: AvailabilityPolicy) -> Self {
        self.availability = availability;
        self
    }

    /// Resolve credentials and build a client for the remote cluster.
    ///
    /// Nothing is cached: credentials are read and a new client is built on
    /// every call, so a rotated secret is used on the next reconciliation.
    #[instrument(skip(self, cr), fields(resource = %cr.name_any()))]
    pub async fn connect(&self, cr: &KubernetesResource) -> Result<ExternalClient> {
        debug!("Connecting");

        let reference = cr
            .spec
            .provider_config_ref
            .as_ref()
            .ok_or(TetherError::ConfigurationMissing)?;

        let ResolvedCredentials {
            provider_config,
            payload,
        } = resolve_credentials(&self.client, Some(reference)).await?;

        let config = credentials_to_connection_config(&payload).await?;

        let kube = match self.availability {
            AvailabilityPolicy::Blocking => {
                mark_available(&self.client, &provider_config).await?;
                (self.new_client)(config)?
            }
            AvailabilityPolicy::BestEffort => {
                let kube = (self.new_client)(config)?;
                if let Err(e) = mark_available(&self.client, &provider_config).await {
                    warn!("{}", e);
                }
                kube
            }
        };

        Ok(ExternalClient::new(kube))
    }
}

/// Record on the ProviderConfig that its credentials resolved successfully
async fn mark_available(client: &Client, provider_config: &ProviderConfig) -> Result<()> {
    let name = provider_config.name_any();
    let mut status = provider_config.status.clone().unwrap_or_default();
    set_condition(&mut status.conditions, Condition::available());

    let patch = json!({
        "apiVersion": ProviderConfig::api_version(&()),
        "kind": ProviderConfig::kind(&()),
        "status": status,
    });

    let provider_configs: Api<ProviderConfig> = Api::all(client.clone());
    provider_configs
        .patch_status(&name, &PatchParams::apply(OPERATOR_NAME).force(), &Patch::Apply(&patch))
        .await
        .map_err(|e| TetherError::ProviderStatusUpdateFailed { name, source: e })?;

    debug!("Marked provider config as available");
    Ok(())
}
