// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for credential lookup, remote client creation, object
//! addressing and CRD discovery.

pub mod client;
pub mod crd;
pub mod credentials;
pub mod object;

pub use client::{connection_config_to_client, credentials_to_connection_config};
pub use crd::wait_for_crds;
pub use credentials::{resolve_credentials, CredentialPayload, ResolvedCredentials};
pub use object::DesiredObject;
