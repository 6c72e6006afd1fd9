// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Remote cluster client creation from provider credentials

use crate::constants::credentials as keys;
use crate::error::{Result, TetherError};
use crate::kubernetes::credentials::CredentialPayload;
use base64::{engine::general_purpose::STANDARD, Engine};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

const CONTEXT_NAME: &str = "remote";

/// Interpret a credentials payload as connection parameters for the remote cluster.
///
/// A `kubeconfig` key wins. Otherwise a single-context kubeconfig is assembled
/// from the connection detail keys, of which `endpoint` is required.
#[instrument(skip(creds), fields(keys = creds.len()))]
pub async fn credentials_to_connection_config(creds: &CredentialPayload) -> Result<KConfig> {
    let kubeconfig = match creds.get(keys::KUBECONFIG) {
        Some(raw) => {
            debug!("Using kubeconfig from provider secret");
            parse_kubeconfig(raw)?
        }
        None => {
            debug!("No kubeconfig in provider secret, using connection details");
            kubeconfig_from_connection_details(creds)?
        }
    };

    KConfig::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| TetherError::InvalidCredentials(format!("Failed to create config: {}", e)))
}

/// Create a Kubernetes client bound to the given connection parameters
pub fn connection_config_to_client(config: KConfig) -> Result<Client> {
    Client::try_from(config).map_err(|e| TetherError::ClientConstructionFailed(e.to_string()))
}

fn parse_kubeconfig(raw: &[u8]) -> Result<Kubeconfig> {
    let kubeconfig = std::str::from_utf8(raw).map_err(|e| {
        TetherError::InvalidCredentials(format!("Failed to decode kubeconfig: {}", e))
    })?;

    serde_yaml::from_str(kubeconfig)
        .map_err(|e| TetherError::InvalidCredentials(format!("Failed to parse kubeconfig: {}", e)))
}

fn kubeconfig_from_connection_details(creds: &CredentialPayload) -> Result<Kubeconfig> {
    let endpoint = creds
        .get(keys::ENDPOINT)
        .map(|v| utf8(keys::ENDPOINT, v))
        .transpose()?
        .ok_or_else(|| {
            TetherError::InvalidCredentials(format!(
                "secret contains neither '{}' nor '{}'",
                keys::KUBECONFIG,
                keys::ENDPOINT
            ))
        })?;

    let mut cluster = Map::new();
    cluster.insert("server".to_string(), json!(endpoint.trim()));
    if let Some(ca) = creds.get(keys::CLUSTER_CA) {
        cluster.insert("certificate-authority-data".to_string(), json!(STANDARD.encode(ca)));
    }

    let mut user = Map::new();
    if let Some(cert) = creds.get(keys::CLIENT_CERT) {
        user.insert("client-certificate-data".to_string(), json!(STANDARD.encode(cert)));
    }
    if let Some(key) = creds.get(keys::CLIENT_KEY) {
        user.insert("client-key-data".to_string(), json!(STANDARD.encode(key)));
    }
    for (secret_key, kubeconfig_key) in [
        (keys::TOKEN, "token"),
        (keys::USERNAME, "username"),
        (keys::PASSWORD, "password"),
    ] {
        if let Some(v) = creds.get(secret_key) {
            user.insert(kubeconfig_key.to_string(), json!(utf8(secret_key, v)?));
        }
    }

    let kubeconfig = json!({
        "apiVersion": "v1",
        "kind": "Config",
        "clusters": [{ "name": CONTEXT_NAME, "cluster": Value::Object(cluster) }],
        "users": [{ "name": CONTEXT_NAME, "user": Value::Object(user) }],
        "contexts": [{
            "name": CONTEXT_NAME,
            "context": { "cluster": CONTEXT_NAME, "user": CONTEXT_NAME }
        }],
        "current-context": CONTEXT_NAME,
    });

    serde_json::from_value(kubeconfig).map_err(|e| {
        TetherError::InvalidCredentials(format!("Failed to assemble kubeconfig: {}", e))
    })
}

fn utf8(key: &str, value: &[u8]) -> Result<String> {
    String::from_utf8(value.to_vec())
        .map_err(|e| TetherError::InvalidCredentials(format!("Key '{}' is not UTF-8: {}", key, e)))
}
