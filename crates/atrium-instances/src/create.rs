//! Creation orchestration
//!
//! Creation bifurcates on the instance type: user-provided instances
//! are fully materialized within the request, managed instances are
//! handed to the asynchronous provisioning engine and only the job
//! handle is returned.
//!
//! Both paths run the same ordered preconditions first, first failure
//! winning: the creation feature flag (bypassed by global write
//! capability), owning-space existence and readability, the
//! suspended-organization check (also bypassed by global write), and
//! write capability on the owning space. A disabled flag is a
//! distinct error kind from a missing capability.

use crate::messages::{CreateInstanceRequest, CreateManagedRequest, CreateUserProvidedRequest};
use crate::visibility::{can_read_space, can_write_space};
use atrium_core::{
    ActorInfo, AtriumError, AtriumResult, AuditAction, EngineError, EventRecorder, FeatureFlag,
    FeatureFlags, InstanceKind, InstanceStore, JobId, PermissionOracle, PlanCatalog,
    ProvisionRequest, ProvisioningEngine, ServiceInstance, Space, SpaceStore,
};
use std::sync::Arc;
use tracing::debug;

fn unprocessable_space() -> AtriumError {
    AtriumError::unprocessable(
        "Invalid space. Ensure that the space exists and you have access to it.",
    )
}

/// Terminal shape of a creation request
#[derive(Debug, Clone, PartialEq)]
pub enum Created {
    /// A user-provided instance, fully materialized in this request
    Instance(ServiceInstance),
    /// The job handle for an enqueued managed provisioning; the
    /// instance materializes asynchronously outside this layer
    Job(JobId),
}

/// Orchestrates the dual-path creation state machine
pub struct CreateOrchestrator {
    spaces: Arc<dyn SpaceStore>,
    instances: Arc<dyn InstanceStore>,
    plans: Arc<dyn PlanCatalog>,
    engine: Arc<dyn ProvisioningEngine>,
    events: Arc<dyn EventRecorder>,
    flags: Arc<dyn FeatureFlags>,
}

impl CreateOrchestrator {
    /// Create a creation orchestrator over the given collaborators
    pub fn new(
        spaces: Arc<dyn SpaceStore>,
        instances: Arc<dyn InstanceStore>,
        plans: Arc<dyn PlanCatalog>,
        engine: Arc<dyn ProvisioningEngine>,
        events: Arc<dyn EventRecorder>,
        flags: Arc<dyn FeatureFlags>,
    ) -> Self {
        Self {
            spaces,
            instances,
            plans,
            engine,
            events,
            flags,
        }
    }

    /// Run the preconditions in order, then dispatch on the request
    /// type
    pub async fn create(
        &self,
        request: CreateInstanceRequest,
        actor: &ActorInfo,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<Created> {
        let admin = perms.can_write_globally().await;

        if !admin && !self.flags.enabled(FeatureFlag::InstanceCreation).await {
            return Err(AtriumError::feature_disabled(
                "service instance creation is disabled",
            ));
        }

        let space = self
            .spaces
            .find_space(request.space())
            .await?
            .ok_or_else(unprocessable_space)?;
        if !can_read_space(&space, perms).await {
            return Err(unprocessable_space());
        }

        if space.in_suspended_org() && !admin {
            return Err(AtriumError::unauthorized(
                "The organization of the target space is suspended",
            ));
        }

        if !can_write_space(&space, perms).await {
            return Err(AtriumError::unauthorized(
                "Write capability on the target space is required to create a service instance",
            ));
        }

        match request {
            CreateInstanceRequest::UserProvided(message) => {
                self.create_user_provided(message, actor).await
            }
            CreateInstanceRequest::Managed(message) => {
                self.create_managed(message, &space, perms).await
            }
        }
    }

    /// Synchronous path: persist and return the instance in the same
    /// call
    async fn create_user_provided(
        &self,
        message: CreateUserProvidedRequest,
        actor: &ActorInfo,
    ) -> AtriumResult<Created> {
        let instance = ServiceInstance::new(
            message.name,
            message.space,
            InstanceKind::UserProvided {
                credentials: message.credentials,
                syslog_drain_url: message.syslog_drain_url,
                route_service_url: message.route_service_url,
            },
        )
        .with_tags(message.tags);

        self.instances.persist(&instance).await?;
        self.events
            .record(actor, AuditAction::Create, &instance)
            .await;
        debug!(instance = %instance.id, space = %instance.space, "user-provided instance created");
        Ok(Created::Instance(instance))
    }

    /// Asynchronous path: verify the plan on both visibility axes,
    /// enqueue provisioning, return only the job handle
    async fn create_managed(
        &self,
        message: CreateManagedRequest,
        space: &Space,
        perms: &dyn PermissionOracle,
    ) -> AtriumResult<Created> {
        let plan_visible = match self.plans.find_plan(message.plan).await? {
            Some(plan) => {
                self.plans.plan_visible_to_actor(&plan, perms).await
                    && self.plans.plan_visible_in_space(&plan, space).await
            }
            None => false,
        };
        if !plan_visible {
            return Err(AtriumError::unprocessable(
                "Invalid service plan. Ensure that the service plan exists and you have access to it.",
            ));
        }

        let request = ProvisionRequest {
            name: message.name,
            space: space.id,
            plan: message.plan,
            parameters: message.parameters,
            tags: message.tags,
        };
        let job = self
            .engine
            .enqueue_provisioning(&request)
            .await
            .map_err(|err| match err {
                EngineError::InvalidPayload { message } => AtriumError::unprocessable(message),
                other => AtriumError::internal(other.to_string()),
            })?;

        debug!(job = %job, space = %space.id, "managed instance provisioning enqueued");
        Ok(Created::Job(job))
    }
}
