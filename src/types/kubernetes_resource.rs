// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{Result, TetherError};
use crate::types::condition::{set_condition, Condition};
use kube::api::DynamicObject;
use kube::{CustomResource, Resource};
use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An arbitrary Kubernetes object to be kept in sync on a remote cluster
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(group = "tether.geeko.me", version = "v1alpha1", kind = "KubernetesResource")]
#[kube(status = "KubernetesResourceStatus")]
#[kube(printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#)]
#[kube(printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#)]
#[kube(printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesResourceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<ProviderConfigReference>,
    pub for_provider: KubernetesResourceParameters,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct ProviderConfigReference {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
pub struct KubernetesResourceParameters {
    /// Template of the object to submit to the remote cluster. Only standard
    /// type and object metadata are required.
    #[schemars(schema_with = "preserve_unknown_fields")]
    pub object: Value,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesResourceStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub at_provider: KubernetesResourceObservation,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct KubernetesResourceObservation {
    /// Last observed state of the remote object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_fields")]
    pub object: Option<Value>,
}

fn preserve_unknown_fields(_: &mut SchemaGenerator) -> Schema {
    let mut schema = SchemaObject {
        instance_type: Some(InstanceType::Object.into()),
        ..Default::default()
    };
    schema
        .extensions
        .insert("x-kubernetes-preserve-unknown-fields".to_string(), Value::Bool(true));
    Schema::Object(schema)
}

impl KubernetesResource {
    /// The desired object template
    pub fn template(&self) -> &Value {
        &self.spec.for_provider.object
    }

    /// Replace the observed object wholesale
    pub fn set_observation(&mut self, object: Value) {
        self.status.get_or_insert_with(Default::default).at_provider.object = Some(object);
    }

    pub fn observation(&self) -> Option<&Value> {
        self.status.as_ref().and_then(|s| s.at_provider.object.as_ref())
    }

    pub fn set_condition(&mut self, condition: Condition) {
        set_condition(
            &mut self.status.get_or_insert_with(Default::default).conditions,
            condition,
        );
    }

    pub fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

/// Entry point for callers holding an untyped object, such as a dynamic watch
/// or a generic managed-resource pipeline. Anything other than a
/// `tether.geeko.me/v1alpha1` KubernetesResource is `WrongResourceType`.
impl TryFrom<&DynamicObject> for KubernetesResource {
    type Error = TetherError;

    fn try_from(obj: &DynamicObject) -> Result<Self> {
        let (api_version, kind) = obj
            .types
            .as_ref()
            .map(|t| (t.api_version.as_str(), t.kind.as_str()))
            .unwrap_or_default();

        if api_version != KubernetesResource::api_version(&()) || kind != KubernetesResource::kind(&()) {
            return Err(TetherError::WrongResourceType(format!("{}, {}", api_version, kind)));
        }

        serde_json::to_value(obj)
            .and_then(serde_json::from_value)
            .map_err(|e| TetherError::WrongResourceType(e.to_string()))
    }
}
