// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes reconcilers that react to watch events.

pub mod kubernetes_resource;

pub use kubernetes_resource::KubernetesResourceReconciler;
