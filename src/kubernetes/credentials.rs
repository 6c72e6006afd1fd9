// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ProviderConfig and credentials secret lookup

use crate::error::{Result, TetherError};
use crate::types::{ProviderConfig, ProviderConfigReference};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Raw key/value payload of a credentials secret
pub type CredentialPayload = BTreeMap<String, Vec<u8>>;

/// A ProviderConfig together with the payload of the secret it refers to
#[derive(Debug)]
pub struct ResolvedCredentials {
    pub provider_config: ProviderConfig,
    pub payload: CredentialPayload,
}

/// Load the referenced ProviderConfig and fetch its credentials secret.
///
/// The secret key selector is not used to pick a single value: connection
/// parsing may need several keys, so the whole payload is returned.
#[instrument(skip(client))]
pub async fn resolve_credentials(
    client: &Client,
    reference: Option<&ProviderConfigReference>,
) -> Result<ResolvedCredentials> {
    let Some(reference) = reference else {
        return Err(TetherError::ConfigurationMissing);
    };

    let provider_configs: Api<ProviderConfig> = Api::all(client.clone());
    let provider_config = provider_configs.get(&reference.name).await.map_err(|e| {
        TetherError::ConfigurationNotFound {
            name: reference.name.clone(),
            source: e,
        }
    })?;

    let secret_ref = &provider_config.spec.credentials_secret_ref;
    if let Some(key) = &secret_ref.key {
        debug!("Ignoring secret key selector '{}', using the whole secret", key);
    }

    info!(
        "Getting credentials secret '{}/{}' for provider config '{}'...",
        secret_ref.namespace, secret_ref.name, reference.name
    );

    let payload = get_secret_data(client, &secret_ref.namespace, &secret_ref.name).await?;

    Ok(ResolvedCredentials {
        provider_config,
        payload,
    })
}

/// Fetch the data of a secret. A secret without a data field is an error,
/// an empty one is not.
#[instrument(skip(client))]
pub async fn get_secret_data(client: &Client, namespace: &str, name: &str) -> Result<CredentialPayload> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);

    let secret = secrets
        .get(name)
        .await
        .map_err(|e| TetherError::SecretNotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
            source: e,
        })?;

    let Some(data) = secret.data else {
        return Err(TetherError::SecretEmpty {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
    };

    Ok(data.into_iter().map(|(k, v)| (k, v.0)).collect())
}
