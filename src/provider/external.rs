// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Observe, create, update and delete of the desired object on the remote cluster.

use crate::constants::OPERATOR_NAME;
use crate::error::{is_not_found, Result, TetherError};
use crate::kubernetes::object::{to_observation, DesiredObject};
use crate::types::KubernetesResource;
use kube::{
    api::{DeleteParams, Patch, PatchParams, PostParams},
    Client, ResourceExt,
};
use tracing::{debug, info, instrument};

/// Result of observing the remote object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    pub resource_exists: bool,
    pub resource_up_to_date: bool,
}

/// Operates on one remote cluster. Created fresh for every reconciliation.
pub struct ExternalClient {
    kube: Client,
}

impl ExternalClient {
    pub fn new(kube: Client) -> Self {
        Self { kube }
    }

    /// Look the desired object up on the remote cluster and record what was found.
    ///
    /// An existing object is never reported as up to date, so every pass
    /// re-applies the desired document and corrects drift.
    #[instrument(skip(self, cr), fields(resource = %cr.name_any()))]
    pub async fn observe(&self, cr: &mut KubernetesResource) -> Result<ExternalObservation> {
        let desired = DesiredObject::from_template(cr.template())?;
        debug!("Observing {} '{}'", desired.kind(), desired.name());

        let read_failed = |source: kube::Error| TetherError::RemoteReadFailed {
            kind: desired.kind().to_string(),
            name: desired.name().to_string(),
            source,
        };
        let api = desired.api(self.kube.clone()).await.map_err(read_failed)?;

        let observed = match api.get(desired.name()).await {
            Ok(observed) => observed,
            Err(e) if is_not_found(&e) => {
                debug!("{} '{}' does not exist", desired.kind(), desired.name());
                return Ok(ExternalObservation::default());
            }
            Err(e) => return Err(read_failed(e)),
        };

        cr.set_observation(to_observation(&observed)?);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: false,
        })
    }

    #[instrument(skip(self, cr), fields(resource = %cr.name_any()))]
    pub async fn create(&self, cr: &mut KubernetesResource) -> Result<()> {
        let desired = DesiredObject::from_template(cr.template())?;
        info!("Creating {} '{}'", desired.kind(), desired.name());

        let pp = PostParams {
            field_manager: Some(OPERATOR_NAME.to_string()),
            ..Default::default()
        };
        let create_failed = |source: kube::Error| TetherError::RemoteCreateFailed {
            kind: desired.kind().to_string(),
            name: desired.name().to_string(),
            source,
        };
        let created = desired
            .api(self.kube.clone())
            .await
            .map_err(create_failed)?
            .create(&pp, desired.object())
            .await
            .map_err(create_failed)?;

        cr.set_observation(to_observation(&created)?);
        Ok(())
    }

    /// Apply the full desired document with server-side apply.
    #[instrument(skip(self, cr), fields(resource = %cr.name_any()))]
    pub async fn update(&self, cr: &mut KubernetesResource) -> Result<()> {
        let desired = DesiredObject::from_template(cr.template())?;
        debug!("Applying {} '{}'", desired.kind(), desired.name());

        let pp = PatchParams::apply(OPERATOR_NAME).force();
        let update_failed = |source: kube::Error| TetherError::RemoteUpdateFailed {
            kind: desired.kind().to_string(),
            name: desired.name().to_string(),
            source,
        };
        let applied = desired
            .api(self.kube.clone())
            .await
            .map_err(update_failed)?
            .patch(desired.name(), &pp, &Patch::Apply(desired.object()))
            .await
            .map_err(update_failed)?;

        cr.set_observation(to_observation(&applied)?);
        Ok(())
    }

    /// Delete the remote object. An object that is already gone is not an error.
    #[instrument(skip(self, cr), fields(resource = %cr.name_any()))]
    pub async fn delete(&self, cr: &KubernetesResource) -> Result<()> {
        let desired = DesiredObject::from_template(cr.template())?;
        info!("Deleting {} '{}'", desired.kind(), desired.name());

        let delete_failed = |source: kube::Error| TetherError::RemoteDeleteFailed {
            kind: desired.kind().to_string(),
            name: desired.name().to_string(),
            source,
        };
        // An unresolvable kind is an error here, never "already deleted"
        let api = desired.api(self.kube.clone()).await.map_err(delete_failed)?;

        match api.delete(desired.name(), &DeleteParams::default()).await {
            Ok(_) => Ok(()),
            Err(e) if is_not_found(&e) => {
                debug!("{} '{}' already deleted", desired.kind(), desired.name());
                Ok(())
            }
            Err(e) => Err(delete_failed(e)),
        }
    }
}
