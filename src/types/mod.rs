// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types owned by Tether.

pub mod condition;
pub mod kubernetes_resource;
pub mod provider_config;

pub use condition::Condition;
pub use kubernetes_resource::{
    KubernetesResource, KubernetesResourceParameters, KubernetesResourceSpec,
    KubernetesResourceStatus, ProviderConfigReference,
};
pub use provider_config::{ProviderConfig, ProviderConfigSpec, ProviderConfigStatus, SecretKeySelector};
