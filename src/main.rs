// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::{Client, CustomResourceExt};
use tracing::{info, warn};

use tether::config::Config;
use tether::kubernetes::wait_for_crds;
use tether::reconcilers::KubernetesResourceReconciler;
use tether::types::{KubernetesResource, ProviderConfig};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().nth(1).as_deref() == Some("crd") {
        return print_crds();
    }

    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Tether provider");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: poll_interval={:?}, error_requeue_interval={:?}, provider_status_best_effort={}",
        config.poll_interval, config.error_requeue_interval, config.provider_status_best_effort
    );

    // Create Kubernetes client
    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for Tether CRDs to become available...");
    wait_for_crds(&client)
        .await
        .context("Failed waiting for Tether CRDs")?;

    let reconciler = KubernetesResourceReconciler::new(client, config);

    info!("Starting reconciler...");
    reconciler.run().await?;

    // The controller runs until the process is stopped
    warn!("Reconciler stopped");
    Ok(())
}

/// Print the CustomResourceDefinitions as a multi-document YAML stream
fn print_crds() -> Result<()> {
    let documents = [
        serde_yaml::to_string(&ProviderConfig::crd())?,
        serde_yaml::to_string(&KubernetesResource::crd())?,
    ];
    print!("{}", documents.join("---\n"));
    Ok(())
}
