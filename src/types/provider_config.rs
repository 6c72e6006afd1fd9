// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::condition::Condition;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Names the Secret holding the credentials of a remote cluster
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(group = "tether.geeko.me", version = "v1alpha1", kind = "ProviderConfig")]
#[kube(status = "ProviderConfigStatus")]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigSpec {
    pub credentials_secret_ref: SecretKeySelector,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    pub namespace: String,
    pub name: String,
    /// Accepted for compatibility, the whole secret is always consumed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}
