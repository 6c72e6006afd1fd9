// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Decoding of desired object templates into addressable remote objects

use crate::error::{Result, TetherError};
use kube::api::{DynamicObject, GroupVersionKind};
use kube::discovery::{pinned_kind, Scope};
use kube::{Api, Client};
use serde_json::Value;
use tracing::debug;

/// A desired object decoded from a KubernetesResource template
#[derive(Debug, Clone)]
pub struct DesiredObject {
    object: DynamicObject,
    gvk: GroupVersionKind,
    name: String,
}

impl DesiredObject {
    /// Decode a template. It must be a Kubernetes object carrying at least
    /// `apiVersion`, `kind` and `metadata.name`.
    pub fn from_template(template: &Value) -> Result<Self> {
        if !template.is_object() {
            return Err(TetherError::TemplateUnmarshal(
                "template is not an object".to_string(),
            ));
        }

        let object: DynamicObject = serde_json::from_value(template.clone())
            .map_err(|e| TetherError::TemplateUnmarshal(e.to_string()))?;

        let Some(types) = object.types.as_ref() else {
            return Err(TetherError::TemplateUnmarshal(
                "template has no apiVersion or kind".to_string(),
            ));
        };
        if types.api_version.is_empty() || types.kind.is_empty() {
            return Err(TetherError::TemplateUnmarshal(
                "template has an empty apiVersion or kind".to_string(),
            ));
        }

        let name = object
            .metadata
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| TetherError::TemplateUnmarshal("template has no metadata.name".to_string()))?;

        let (group, version) = parse_api_version(&types.api_version);
        let gvk = GroupVersionKind::gvk(&group, &version, &types.kind);

        Ok(DesiredObject { object, gvk, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.object.metadata.namespace.as_deref()
    }

    pub fn kind(&self) -> &str {
        &self.gvk.kind
    }

    pub fn object(&self) -> &DynamicObject {
        &self.object
    }

    /// Api for this object's kind, resolved through discovery on `client`.
    ///
    /// The served plural and scope decide the path. A namespace in the template
    /// is ignored for cluster-scoped kinds, and a namespaced kind without one
    /// falls back to the client's default namespace.
    pub async fn api(&self, client: Client) -> kube::Result<Api<DynamicObject>> {
        let (resource, caps) = pinned_kind(&client, &self.gvk).await?;
        debug!("Resolved {} to '{}' ({:?})", self.gvk.kind, resource.plural, caps.scope);

        Ok(match (&caps.scope, self.namespace()) {
            (Scope::Cluster, _) => Api::all_with(client, &resource),
            (Scope::Namespaced, Some(ns)) => Api::namespaced_with(client, ns, &resource),
            (Scope::Namespaced, None) => Api::default_namespaced_with(client, &resource),
        })
    }
}

/// Parse apiVersion into (group, version); the core group is empty
pub fn parse_api_version(api_version: &str) -> (String, String) {
    match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    }
}

/// Serialize a remote object for storage in the observation
pub fn to_observation(object: &DynamicObject) -> Result<Value> {
    Ok(serde_json::to_value(object)?)
}
