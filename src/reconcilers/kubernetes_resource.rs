// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! KubernetesResource reconciler - drives the remote object through observe,
//! create/update and delete, and persists the observation and conditions.

use crate::config::Config;
use crate::constants::{FINALIZER, OPERATOR_NAME};
use crate::error::{Result, TetherError};
use crate::provider::Connector;
use crate::types::{Condition, KubernetesResource};
use futures::StreamExt;
use kube::{
    api::{Patch, PatchParams},
    runtime::{controller::Action, Controller},
    Api, Client, Resource, ResourceExt,
};
use kube_runtime::finalizer::{finalizer, Event};
use kube_runtime::watcher::Config as WatcherConfig;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct KubernetesResourceReconciler {
    client: Client,
    connector: Connector,
    config: Config,
}

impl KubernetesResourceReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        let connector = Connector::new(client.clone(), &config);
        Self {
            client,
            connector,
            config,
        }
    }

    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connector = connector;
        self
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let resources: Api<KubernetesResource> = Api::all(self.client.clone());
        let context = Arc::new(self);

        Controller::new(resources, WatcherConfig::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled KubernetesResource: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }

    async fn apply(&self, cr: Arc<KubernetesResource>) -> Result<Action> {
        let mut cr = (*cr).clone();

        match self.sync(&mut cr).await {
            Ok(()) => {
                cr.set_condition(Condition::reconcile_success());
                self.persist_status(&cr).await?;
                Ok(Action::requeue(self.config.poll_interval))
            }
            Err(e) => {
                self.record_error(&mut cr, &e).await;
                Err(e)
            }
        }
    }

    /// One pass of the observe then create or update cycle
    async fn sync(&self, cr: &mut KubernetesResource) -> Result<()> {
        let external = self.connector.connect(cr).await?;

        let observation = external.observe(cr).await?;
        if !observation.resource_exists {
            external.create(cr).await?;
            cr.set_condition(Condition::creating());
            return Ok(());
        }

        cr.set_condition(Condition::available());
        if !observation.resource_up_to_date {
            external.update(cr).await?;
        }
        Ok(())
    }

    async fn cleanup(&self, cr: Arc<KubernetesResource>) -> Result<Action> {
        let mut cr = (*cr).clone();
        info!("Deleting remote object of {}", cr.name_any());

        cr.set_condition(Condition::deleting());
        if let Err(e) = self.persist_status(&cr).await {
            warn!("Failed to record deletion of {}: {}", cr.name_any(), e);
        }

        let result = match self.connector.connect(&cr).await {
            Ok(external) => external.delete(&cr).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Ok(Action::await_change()),
            Err(e) => {
                self.record_error(&mut cr, &e).await;
                Err(e)
            }
        }
    }

    /// Write conditions and the observed object with server-side apply.
    /// The field manager owns the whole status, so dropped fields are removed.
    async fn persist_status(&self, cr: &KubernetesResource) -> Result<()> {
        let resources: Api<KubernetesResource> = Api::all(self.client.clone());
        let patch = json!({
            "apiVersion": KubernetesResource::api_version(&()),
            "kind": KubernetesResource::kind(&()),
            "status": cr.status,
        });

        resources
            .patch_status(
                &cr.name_any(),
                &PatchParams::apply(OPERATOR_NAME).force(),
                &Patch::Apply(&patch),
            )
            .await?;
        Ok(())
    }

    async fn record_error(&self, cr: &mut KubernetesResource, err: &TetherError) {
        cr.set_condition(Condition::reconcile_error(err.to_string()));
        if let Err(e) = self.persist_status(cr).await {
            warn!("Failed to record reconcile error on {}: {}", cr.name_any(), e);
        }
    }
}

async fn reconcile(
    cr: Arc<KubernetesResource>,
    ctx: Arc<KubernetesResourceReconciler>,
) -> Result<Action> {
    debug!("Reconciling KubernetesResource: {}", cr.name_any());

    let resources: Api<KubernetesResource> = Api::all(ctx.client.clone());
    finalizer(&resources, FINALIZER, cr, |event| async {
        match event {
            Event::Apply(cr) => ctx.apply(cr).await,
            Event::Cleanup(cr) => ctx.cleanup(cr).await,
        }
    })
    .await
    .map_err(|e| TetherError::FinalizerError(Box::new(e)))
}

fn error_policy(
    cr: Arc<KubernetesResource>,
    error: &TetherError,
    ctx: Arc<KubernetesResourceReconciler>,
) -> Action {
    error!("Reconciliation error for {}: {}", cr.name_any(), error);
    Action::requeue(ctx.config.error_requeue_interval)
}
