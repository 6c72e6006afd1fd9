// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Connection to a remote cluster and the observe/create/update/delete cycle.

pub mod connector;
pub mod external;

pub use connector::{AvailabilityPolicy, ClientFactory, Connector};
pub use external::{ExternalClient, ExternalObservation};
