//! Update orchestration
//!
//! Applies a validated partial patch to an instance and persists the
//! result. Pure over (instance, patch) apart from persistence; no
//! cross-instance side effects. The caller has already verified
//! read-visibility and write capability on the owning space —
//! shared-space write access is never sufficient.

use crate::messages::UpdateInstanceRequest;
use atrium_core::{
    ActorInfo, AtriumError, AtriumResult, AuditAction, EventRecorder, InstanceKind, InstanceStore,
    ServiceInstance,
};
use std::sync::Arc;
use tracing::debug;

/// Orchestrates partial updates of service instances
pub struct UpdateOrchestrator {
    instances: Arc<dyn InstanceStore>,
    events: Arc<dyn EventRecorder>,
}

impl UpdateOrchestrator {
    /// Create an update orchestrator over the given collaborators
    pub fn new(instances: Arc<dyn InstanceStore>, events: Arc<dyn EventRecorder>) -> Self {
        Self { instances, events }
    }

    /// Apply `patch` to `instance`, persist, and return the new state
    pub async fn update(
        &self,
        instance: &ServiceInstance,
        patch: &UpdateInstanceRequest,
        actor: &ActorInfo,
    ) -> AtriumResult<ServiceInstance> {
        let mut updated = instance.clone();

        if let Some(name) = &patch.name {
            updated.name = name.clone();
        }
        if let Some(tags) = &patch.tags {
            updated.tags = tags.clone();
        }

        if patch.touches_user_provided_fields() {
            match &mut updated.kind {
                InstanceKind::UserProvided {
                    credentials,
                    syslog_drain_url,
                    route_service_url,
                } => {
                    if let Some(new_credentials) = &patch.credentials {
                        *credentials = new_credentials.clone();
                    }
                    if let Some(url) = &patch.syslog_drain_url {
                        *syslog_drain_url = Some(url.clone());
                    }
                    if let Some(url) = &patch.route_service_url {
                        *route_service_url = Some(url.clone());
                    }
                }
                InstanceKind::Managed { .. } => {
                    return Err(AtriumError::unprocessable(
                        "Credentials and drain fields can only be updated on \
                         user-provided service instances",
                    ))
                }
            }
        }

        self.instances.persist(&updated).await?;
        self.events
            .record(actor, AuditAction::Update, &updated)
            .await;
        debug!(instance = %updated.id, "instance updated");
        Ok(updated)
    }
}
