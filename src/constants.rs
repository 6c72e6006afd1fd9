// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// API group of the Tether custom resources
pub const API_GROUP: &str = "tether.geeko.me";

/// The operator name used for server-side apply and object creation
pub const OPERATOR_NAME: &str = "tether";

/// Finalizer guarding remote cleanup of a KubernetesResource
pub const FINALIZER: &str = "tether.geeko.me/finalizer";

/// Keys understood in a ProviderConfig credentials secret
pub mod credentials {
    /// A complete kubeconfig document, takes precedence over the other keys
    pub const KUBECONFIG: &str = "kubeconfig";
    pub const ENDPOINT: &str = "endpoint";
    pub const CLUSTER_CA: &str = "clusterCA";
    pub const CLIENT_CERT: &str = "clientCert";
    pub const CLIENT_KEY: &str = "clientKey";
    pub const TOKEN: &str = "token";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
}

/// Status condition types and reasons
pub mod conditions {
    pub const TYPE_READY: &str = "Ready";
    pub const TYPE_SYNCED: &str = "Synced";

    pub const REASON_AVAILABLE: &str = "Available";
    pub const REASON_CREATING: &str = "Creating";
    pub const REASON_DELETING: &str = "Deleting";
    pub const REASON_RECONCILE_SUCCESS: &str = "ReconcileSuccess";
    pub const REASON_RECONCILE_ERROR: &str = "ReconcileError";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
