//! The transport-agnostic operation surface
//!
//! [`InstanceService`] composes the visibility gate with the
//! orchestrators and exposes one method per outward operation. Every
//! method is gate-first: reads pass through the visibility gate,
//! mutations additionally require write capability on the owning
//! space before any orchestrator runs. Request bodies are validated
//! before any collaborator is consulted.
//!
//! The permission oracle and actor identity are explicit parameters
//! on every call; the service itself holds only request-independent
//! collaborators.

use crate::create::{CreateOrchestrator, Created};
use crate::messages::{CreateInstanceRequest, ShareTargets, UpdateInstanceRequest};
use crate::read::{read_credentials, read_parameters};
use crate::share::ShareOrchestrator;
use crate::update::UpdateOrchestrator;
use crate::visibility::{can_read_instance, can_read_space, can_write_space};
use atrium_core::{
    ActorInfo, AtriumError, AtriumResult, EventRecorder, FeatureFlag, FeatureFlags, InstanceId,
    InstanceStore, PermissionOracle, PlanCatalog, ProvisioningEngine, ServiceInstance, Space,
    SpaceId, SpaceStore,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The authorization-gated service instance surface
pub struct InstanceService {
    spaces: Arc<dyn SpaceStore>,
    instances: Arc<dyn InstanceStore>,
    engine: Arc<dyn ProvisioningEngine>,
    flags: Arc<dyn FeatureFlags>,
    share: ShareOrchestrator,
    create: CreateOrchestrator,
    update: UpdateOrchestrator,
}

impl InstanceService {
    /// Wire the service over its collaborators
    pub fn new(
        spaces: Arc<dyn SpaceStore>,
        instances: Arc<dyn InstanceStore>,
        plans: Arc<dyn PlanCatalog>,
        engine: Arc<dyn ProvisioningEngine>,
        events: Arc<dyn EventRecorder>,
        flags: Arc<dyn FeatureFlags>,
    ) -> Self {
        Self {
            share: ShareOrchestrator::new(spaces.clone(), instances.clone(), events.clone()),
            create: CreateOrchestrator::new(
                spaces.clone(),
                instances.clone(),
                plans,
                engine.clone(),
                events.clone(),
                flags.clone(),
            ),
            update: UpdateOrchestrator::new(instances.clone(), events),
            spaces,
            instances,
            engine,
            flags,
        }
    }

    /// Load an instance through the visibility gate; absent and
    /// unreadable are the same not-found answer
    async fn load_visible(
        &self,
        id: InstanceId,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<ServiceInstance> {
        let Some(instance) = self.instances.find_instance(id).await? else {
            return Err(AtriumError::not_found("Service instance not found"));
        };
        if !can_read_instance(&instance, self.spaces.as_ref(), perms).await? {
            return Err(AtriumError::not_found("Service instance not found"));
        }
        Ok(instance)
    }

    /// Resolve the owning space; its absence is a store inconsistency
    async fn owning_space(&self, instance: &ServiceInstance) -> AtriumResult<Space> {
        self.spaces.find_space(instance.space).await?.ok_or_else(|| {
            AtriumError::internal(format!("owning space {} does not resolve", instance.space))
        })
    }

    /// Show one instance to the actor
    pub async fn show_instance(
        &self,
        id: InstanceId,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<ServiceInstance> {
        self.load_visible(id, perms).await
    }

    /// List every instance the actor can read; global readers see all
    pub async fn list_instances(
        &self,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<Vec<ServiceInstance>> {
        let all = self.instances.list_instances().await?;
        if perms.can_read_globally().await {
            return Ok(all);
        }

        let mut visible = Vec::with_capacity(all.len());
        for instance in all {
            if can_read_instance(&instance, self.spaces.as_ref(), perms).await? {
                visible.push(instance);
            }
        }
        Ok(visible)
    }

    /// Create an instance from a request body; returns either the
    /// materialized instance or the provisioning job handle
    pub async fn create_instance(
        &self,
        body: &serde_json::Value,
        actor: &ActorInfo,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<Created> {
        let request = CreateInstanceRequest::from_body(body)?;
        self.create.create(request, actor, perms).await
    }

    /// Apply a partial update to an instance
    pub async fn update_instance(
        &self,
        id: InstanceId,
        body: &serde_json::Value,
        actor: &ActorInfo,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<ServiceInstance> {
        let patch = UpdateInstanceRequest::from_body(body)?;
        let instance = self.load_visible(id, perms).await?;
        let owning = self.owning_space(&instance).await?;
        if !can_write_space(&owning, perms).await {
            return Err(AtriumError::unauthorized(
                "Write capability on the owning space is required to update a service instance",
            ));
        }
        self.update.update(&instance, &patch, actor).await
    }

    /// Share an instance into the target spaces of a relationship
    /// body, returning the full updated shared-space set
    pub async fn share_instance(
        &self,
        id: InstanceId,
        body: &serde_json::Value,
        actor: &ActorInfo,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<BTreeSet<SpaceId>> {
        let targets = ShareTargets::from_body(body)?;

        if !self.flags.enabled(FeatureFlag::InstanceSharing).await {
            return Err(AtriumError::feature_disabled(
                "service instance sharing is disabled",
            ));
        }

        let instance = self.load_visible(id, perms).await?;
        let owning = self.owning_space(&instance).await?;
        if !can_write_space(&owning, perms).await {
            return Err(AtriumError::unauthorized(
                "Write capability on the owning space is required to share a service instance",
            ));
        }

        let updated = self.share.share(&instance, &targets, actor, perms).await?;
        Ok(updated.shared_spaces().clone())
    }

    /// Remove one sharing edge from an instance
    pub async fn unshare_instance(
        &self,
        id: InstanceId,
        target: SpaceId,
        actor: &ActorInfo,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<()> {
        let instance = self.load_visible(id, perms).await?;
        let owning = self.owning_space(&instance).await?;
        if !can_write_space(&owning, perms).await {
            return Err(AtriumError::unauthorized(
                "Write capability on the owning space is required to unshare a service instance",
            ));
        }

        self.share.unshare(&instance, target, actor).await?;
        Ok(())
    }

    /// List the spaces an instance is shared into; gated on read
    /// capability in the owning space
    pub async fn list_shared_spaces(
        &self,
        id: InstanceId,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<BTreeSet<SpaceId>> {
        let instance = match self.instances.find_instance(id).await? {
            Some(instance) => instance,
            None => return Err(AtriumError::not_found("Service instance not found")),
        };
        let owning = self.owning_space(&instance).await?;
        if !can_read_space(&owning, perms).await {
            return Err(AtriumError::not_found("Service instance not found"));
        }
        Ok(instance.shared_spaces().clone())
    }

    /// Expose the stored credentials of a user-provided instance
    pub async fn credentials(
        &self,
        id: InstanceId,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<serde_json::Value> {
        let instance = self.load_visible(id, perms).await?;
        let owning = self.owning_space(&instance).await?;
        read_credentials(&instance, &owning, perms).await
    }

    /// Fetch the live provisioning parameters of a managed instance
    pub async fn parameters(
        &self,
        id: InstanceId,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<serde_json::Value> {
        let instance = self.load_visible(id, perms).await?;
        let owning = self.owning_space(&instance).await?;
        read_parameters(&instance, &owning, self.engine.as_ref(), perms).await
    }
}
