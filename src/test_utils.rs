// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for faking a Kubernetes API server.

use base64::{engine::general_purpose::STANDARD, Engine};
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// An in-memory API server. Objects are stored by their full request path,
/// e.g. `/api/v1/namespaces/default/configmaps/cm1`. Discovery documents are
/// served for a handful of built-in kinds plus any added with `with_resource`.
#[derive(Clone)]
pub struct FakeApiServer {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    objects: HashMap<String, Value>,
    /// Served kinds by group version, as (kind, plural, namespaced)
    resources: HashMap<String, Vec<(String, String, bool)>>,
    failures: HashMap<(String, String), u16>,
    requests: Vec<(String, String)>,
    resource_version: u64,
}

impl Default for FakeApiServer {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeApiServer {
    pub fn new() -> Self {
        let server = FakeApiServer {
            state: Arc::new(Mutex::new(State::default())),
        };
        server
            .with_resource("v1", "ConfigMap", "configmaps", true)
            .with_resource("v1", "Secret", "secrets", true)
            .with_resource("v1", "Namespace", "namespaces", false)
            .with_resource("apps/v1", "Deployment", "deployments", true)
            .with_resource("rbac.authorization.k8s.io/v1", "ClusterRole", "clusterroles", false)
            .with_resource("rbac.authorization.k8s.io/v1", "Role", "roles", true)
    }

    /// Serve `kind` under `group_version` in discovery
    pub fn with_resource(self, group_version: &str, kind: &str, plural: &str, namespaced: bool) -> Self {
        self.state
            .lock()
            .unwrap()
            .resources
            .entry(group_version.to_string())
            .or_default()
            .push((kind.to_string(), plural.to_string(), namespaced));
        self
    }

    /// Seed an object at the given path
    pub fn with_object(self, path: &str, object: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(path.to_string(), object);
        self
    }

    /// Answer every `method` request on `path` with an error status
    pub fn with_failure(self, method: &str, path: &str, code: u16) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((method.to_string(), path.to_string()), code);
        self
    }

    pub fn object(&self, path: &str) -> Option<Value> {
        self.state.lock().unwrap().objects.get(path).cloned()
    }

    /// All requests seen so far as (method, path)
    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests seen so far, leaving out discovery lookups
    pub fn object_requests(&self) -> Vec<(String, String)> {
        self.requests()
            .into_iter()
            .filter(|(_, path)| discovery_group_version(path).is_none())
            .collect()
    }

    /// Build a kube Client backed by this server
    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    fn handle(&self, method: &str, path: &str, body: &[u8]) -> (u16, Value) {
        let mut state = self.state.lock().unwrap();
        state
            .requests
            .push((method.to_string(), path.to_string()));

        if let Some(code) = state.failures.get(&(method.to_string(), path.to_string())) {
            return (*code, status_json(*code, "InternalError", "injected failure"));
        }

        if method == "GET" {
            if let Some(group_version) = discovery_group_version(path) {
                return match state.resources.get(&group_version) {
                    Some(served) => {
                        let served: Vec<(&str, &str, bool)> = served
                            .iter()
                            .map(|(k, p, n)| (k.as_str(), p.as_str(), *n))
                            .collect();
                        (200, api_resource_list(&group_version, &served))
                    }
                    None => (404, not_found_json(path)),
                };
            }
        }

        let payload: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

        match method {
            "GET" => match state.objects.get(path) {
                Some(obj) => (200, obj.clone()),
                None => (404, not_found_json(path)),
            },
            "POST" => {
                let name = payload
                    .pointer("/metadata/name")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let key = format!("{}/{}", path, name);
                if state.objects.contains_key(&key) {
                    return (409, status_json(409, "AlreadyExists", "already exists"));
                }
                let mut obj = payload;
                state.stamp(&mut obj);
                state.objects.insert(key, obj.clone());
                (201, obj)
            }
            "PUT" => {
                if !state.objects.contains_key(path) {
                    return (404, not_found_json(path));
                }
                let mut obj = payload;
                state.stamp(&mut obj);
                state.objects.insert(path.to_string(), obj.clone());
                (200, obj)
            }
            "PATCH" => {
                let (key, is_status) = match path.strip_suffix("/status") {
                    Some(base) => (base.to_string(), true),
                    None => (path.to_string(), false),
                };
                match state.objects.get(&key).cloned() {
                    Some(mut obj) => {
                        merge(&mut obj, &payload);
                        state.stamp(&mut obj);
                        state.objects.insert(key, obj.clone());
                        (200, obj)
                    }
                    None if !is_status => {
                        let mut obj = payload;
                        state.stamp(&mut obj);
                        state.objects.insert(key, obj.clone());
                        (201, obj)
                    }
                    None => (404, not_found_json(path)),
                }
            }
            "DELETE" => match state.objects.remove(path) {
                Some(obj) => (200, obj),
                None => (404, not_found_json(path)),
            },
            _ => (405, status_json(405, "MethodNotAllowed", "method not allowed")),
        }
    }
}

impl State {
    fn stamp(&mut self, obj: &mut Value) {
        self.resource_version += 1;
        if let Some(meta) = obj.get_mut("metadata").and_then(Value::as_object_mut) {
            meta.entry("uid")
                .or_insert_with(|| json!(format!("uid-{}", self.resource_version)));
            meta.insert(
                "resourceVersion".to_string(),
                json!(self.resource_version.to_string()),
            );
        }
    }
}

/// The group version a discovery path asks for: `/api/v1` or `/apis/{group}/{version}`
fn discovery_group_version(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        ["api", version] => Some(version.to_string()),
        ["apis", group, version] => Some(format!("{}/{}", group, version)),
        _ => None,
    }
}

/// JSON merge patch (RFC 7386)
fn merge(target: &mut Value, patch: &Value) {
    match patch {
        Value::Object(fields) => {
            if !target.is_object() {
                *target = json!({});
            }
            if let Some(target) = target.as_object_mut() {
                for (key, value) in fields {
                    if value.is_null() {
                        target.remove(key);
                    } else {
                        merge(target.entry(key.clone()).or_insert(Value::Null), value);
                    }
                }
            }
        }
        _ => *target = patch.clone(),
    }
}

impl Service<Request<Body>> for FakeApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let server = self.clone();

        Box::pin(async move {
            let method = req.method().to_string();
            let path = req.uri().path().to_string();
            let body = req.into_body().collect().await?.to_bytes();

            let (status, payload) = server.handle(&method, &path, &body);

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string().into_bytes()))
                .unwrap())
        })
    }
}

/// Create a Status JSON response body
pub fn status_json(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
}

/// Create an APIResourceList discovery body from (kind, plural, namespaced) entries
pub fn api_resource_list(group_version: &str, served: &[(&str, &str, bool)]) -> Value {
    let resources: Vec<Value> = served
        .iter()
        .map(|(kind, plural, namespaced)| {
            json!({
                "name": plural,
                "singularName": kind.to_lowercase(),
                "namespaced": namespaced,
                "kind": kind,
                "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]
            })
        })
        .collect();

    json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": group_version,
        "resources": resources
    })
}

/// Create a 404 not found response body
pub fn not_found_json(path: &str) -> Value {
    status_json(404, "NotFound", &format!("{} not found", path))
}

pub fn provider_config_path(name: &str) -> String {
    format!("/apis/tether.geeko.me/v1alpha1/providerconfigs/{}", name)
}

pub fn kubernetes_resource_path(name: &str) -> String {
    format!("/apis/tether.geeko.me/v1alpha1/kubernetesresources/{}", name)
}

pub fn secret_path(namespace: &str, name: &str) -> String {
    format!("/api/v1/namespaces/{}/secrets/{}", namespace, name)
}

pub fn configmap_path(namespace: &str, name: &str) -> String {
    format!("/api/v1/namespaces/{}/configmaps/{}", namespace, name)
}

/// Create a mock ProviderConfig JSON object
pub fn provider_config_json(name: &str, secret_namespace: &str, secret_name: &str) -> Value {
    json!({
        "apiVersion": "tether.geeko.me/v1alpha1",
        "kind": "ProviderConfig",
        "metadata": { "name": name, "uid": format!("{}-uid", name) },
        "spec": {
            "credentialsSecretRef": {
                "namespace": secret_namespace,
                "name": secret_name,
                "key": "kubeconfig"
            }
        }
    })
}

/// Create a mock Secret JSON object; `None` data leaves the data field out entirely
pub fn secret_json(namespace: &str, name: &str, data: Option<&[(&str, &str)]>) -> Value {
    let mut secret = json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": { "name": name, "namespace": namespace },
        "type": "Opaque"
    });
    if let Some(data) = data {
        let encoded: serde_json::Map<String, Value> = data
            .iter()
            .map(|(k, v)| (k.to_string(), json!(STANDARD.encode(v))))
            .collect();
        secret["data"] = Value::Object(encoded);
    }
    secret
}

/// A token-authenticated kubeconfig pointing at `server`
pub fn kubeconfig_yaml(server: &str) -> String {
    format!(
        r#"apiVersion: v1
kind: Config
clusters:
- name: remote
  cluster:
    server: {}
    insecure-skip-tls-verify: true
users:
- name: remote
  user:
    token: remote-token
contexts:
- name: remote
  context:
    cluster: remote
    user: remote
    namespace: team-a
current-context: remote
"#,
        server
    )
}

/// The ConfigMap used throughout the control loop tests
pub fn configmap_template() -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": { "name": "cm1", "namespace": "default" },
        "data": { "k": "v" }
    })
}
