//! Sharing orchestration
//!
//! Sharing grants read-only visibility of an instance into spaces
//! other than its owner. The batch share path validates every target
//! before touching the store and is all-or-nothing: one bad target
//! fails the whole request and no edge is added. Unsharing removes
//! exactly one edge and refuses targets that were never shared.
//!
//! Write capability on the owning space is a precondition of both
//! operations and is checked by the caller before invocation.

use crate::aggregate::aggregate_share_failures;
use crate::messages::ShareTargets;
use crate::visibility::{can_read_space, can_write_space};
use atrium_core::{
    ActorInfo, AtriumError, AtriumResult, AuditAction, EventRecorder, InstanceStore,
    PermissionOracle, ServiceInstance, SpaceId, SpaceStore,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrates sharing edges between instances and spaces
pub struct ShareOrchestrator {
    spaces: Arc<dyn SpaceStore>,
    instances: Arc<dyn InstanceStore>,
    events: Arc<dyn EventRecorder>,
}

impl ShareOrchestrator {
    /// Create a share orchestrator over the given collaborators
    pub fn new(
        spaces: Arc<dyn SpaceStore>,
        instances: Arc<dyn InstanceStore>,
        events: Arc<dyn EventRecorder>,
    ) -> Self {
        Self {
            spaces,
            instances,
            events,
        }
    }

    /// Share `instance` into every target space, or fail with one
    /// aggregated error and share into none.
    ///
    /// Targets are partitioned into not-found, unreadable, and
    /// unwriteable sets; unreadable and not-found are reported
    /// together so the operation cannot probe for space existence.
    /// Already-shared targets are accepted as no-ops. Returns the
    /// updated instance with its full shared-space set.
    pub async fn share(
        &self,
        instance: &ServiceInstance,
        targets: &ShareTargets,
        actor: &ActorInfo,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<ServiceInstance> {
        if targets.ids().contains(&instance.space) {
            return Err(AtriumError::unprocessable(format!(
                "Unable to share service instance {} into the space it was created in.",
                instance.name
            )));
        }

        let found = self.spaces.find_spaces(targets.ids()).await?;
        let found_ids: BTreeSet<SpaceId> = found.iter().map(|space| space.id).collect();
        let not_found: Vec<SpaceId> = targets
            .ids()
            .iter()
            .copied()
            .filter(|id| !found_ids.contains(id))
            .collect();

        let mut unreadable = Vec::new();
        let mut unwriteable = Vec::new();
        let mut writeable = Vec::new();
        for space in &found {
            if !can_read_space(space, perms).await {
                unreadable.push(space.id);
            } else if !can_write_space(space, perms).await {
                unwriteable.push(space.id);
            } else {
                writeable.push(space.id);
            }
        }

        if let Some(failure) =
            aggregate_share_failures(&instance.name, not_found, unreadable, unwriteable)
        {
            warn!(
                instance = %instance.id,
                categories = failure.categories().len(),
                "share request rejected"
            );
            return Err(failure.into());
        }

        let updated = self
            .instances
            .add_shared_spaces(instance.id, &writeable)
            .await?;
        self.events
            .record(actor, AuditAction::Share, &updated)
            .await;
        debug!(
            instance = %updated.id,
            shared = updated.shared_spaces().len(),
            "instance shared"
        );
        Ok(updated)
    }

    /// Remove the sharing edge from `instance` to `target`
    ///
    /// Fails with a not-shared error when the target does not resolve
    /// or no edge exists, naming the target explicitly. Other edges
    /// are untouched. Emits an audit record on success.
    pub async fn unshare(
        &self,
        instance: &ServiceInstance,
        target: SpaceId,
        actor: &ActorInfo,
    ) -> AtriumResult<ServiceInstance> {
        let target_space = self.spaces.find_space(target).await?;
        if target_space.is_none() || !instance.is_shared_into(target) {
            return Err(AtriumError::unprocessable(format!(
                "Unable to unshare service instance from space {target}. \
                 Ensure the space exists and the service instance has been shared to this space."
            )));
        }

        let updated = self
            .instances
            .remove_shared_space(instance.id, target)
            .await?;
        self.events
            .record(actor, AuditAction::Unshare, &updated)
            .await;
        debug!(instance = %updated.id, space = %target, "instance unshared");
        Ok(updated)
    }
}
