// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TetherError {
    #[error("managed resource is not a KubernetesResource: {0}")]
    WrongResourceType(String),

    #[error("provider config is not set")]
    ConfigurationMissing,

    #[error("provider config '{name}' could not be retrieved: {source}")]
    ConfigurationNotFound {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("secret '{namespace}/{name}' referred in provider config could not be retrieved: {source}")]
    SecretNotFound {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("secret '{namespace}/{name}' data is nil")]
    SecretEmpty { namespace: String, name: String },

    #[error("cannot create new rest config using provider secret: {0}")]
    InvalidCredentials(String),

    #[error("cannot create new Kubernetes client: {0}")]
    ClientConstructionFailed(String),

    #[error("failed to update ProviderConfig '{name}' status: {source}")]
    ProviderStatusUpdateFailed {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("cannot unmarshal template: {0}")]
    TemplateUnmarshal(String),

    #[error("failed to get {kind} '{name}': {source}")]
    RemoteReadFailed {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to create {kind} '{name}': {source}")]
    RemoteCreateFailed {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to apply {kind} '{name}': {source}")]
    RemoteUpdateFailed {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to delete {kind} '{name}': {source}")]
    RemoteDeleteFailed {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to marshal observed object: {0}")]
    ObservationEncode(#[from] serde_json::Error),

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Finalizer error: {0}")]
    FinalizerError(#[source] Box<kube_runtime::finalizer::Error<TetherError>>),
}

pub type Result<T> = std::result::Result<T, TetherError>;

/// True when a kube error is the API server reporting a missing object
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}
