//! Collaborator interfaces consumed by the orchestration layer
//!
//! Each external collaborator is a pure async trait: the permission
//! oracle, the space and instance stores, the plan catalog, the
//! provisioning engine, the audit event recorder, and the feature
//! flag store. The orchestration layer never sees their internals.
//!
//! The permission oracle and plan catalog answer questions about the
//! *current actor*; an implementation is bound to one actor for one
//! request and is passed explicitly into every gate and orchestrator
//! call, never held as ambient state.

use crate::errors::AtriumResult;
use crate::identifiers::{InstanceId, JobId, OrgId, PlanId, SpaceId, UserId};
use crate::instance::ServiceInstance;
use crate::space::Space;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity of the acting user, carried into audit records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInfo {
    /// The acting user
    pub user: UserId,
    /// Optional display name for audit trails
    pub user_name: Option<String>,
}

impl ActorInfo {
    /// Create actor info for a user
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            user_name: None,
        }
    }

    /// Attach a display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }
}

/// Capability queries over the current actor
///
/// All methods are pure per call; answers are never cached by the
/// orchestration layer beyond the single request.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    /// Whether the actor can read every resource in the system
    async fn can_read_globally(&self) -> bool;

    /// Whether the actor can write every resource in the system
    async fn can_write_globally(&self) -> bool;

    /// Whether the actor can read from `space` within `org`
    async fn can_read_from_space(&self, space: SpaceId, org: OrgId) -> bool;

    /// Whether the actor can write to `space`
    async fn can_write_to_space(&self, space: SpaceId) -> bool;

    /// Whether the actor holds the elevated secrets-read capability
    /// for `space` within `org`; strictly stronger than ordinary read
    async fn can_read_secrets_in_space(&self, space: SpaceId, org: OrgId) -> bool;
}

/// Read-only space resolution
#[async_trait]
pub trait SpaceStore: Send + Sync {
    /// Resolve a single space
    async fn find_space(&self, id: SpaceId) -> AtriumResult<Option<Space>>;

    /// Resolve a batch of spaces; absent ids are silently skipped, so
    /// the result may be shorter than the input
    async fn find_spaces(&self, ids: &[SpaceId]) -> AtriumResult<Vec<Space>>;
}

/// Persistence for service instances and their sharing edges
///
/// Edge mutation must be atomic per call: concurrent share/unshare
/// requests against the same instance may interleave at call
/// granularity but never corrupt the edge set.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Resolve a single instance
    async fn find_instance(&self, id: InstanceId) -> AtriumResult<Option<ServiceInstance>>;

    /// All instances; the caller applies visibility filtering
    async fn list_instances(&self) -> AtriumResult<Vec<ServiceInstance>>;

    /// Persist a new or updated instance
    async fn persist(&self, instance: &ServiceInstance) -> AtriumResult<()>;

    /// Atomically add sharing edges from the instance to every target
    /// space, returning the updated instance
    async fn add_shared_spaces(
        &self,
        id: InstanceId,
        targets: &[SpaceId],
    ) -> AtriumResult<ServiceInstance>;

    /// Atomically remove one sharing edge, returning the updated
    /// instance
    async fn remove_shared_space(
        &self,
        id: InstanceId,
        target: SpaceId,
    ) -> AtriumResult<ServiceInstance>;
}

/// A service plan referenced by managed instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePlan {
    /// Plan identity
    pub id: PlanId,
    /// Human-facing plan name
    pub name: String,
}

/// Plan resolution and visibility predicates
///
/// The two visibility predicates are independent and both must hold
/// before a managed instance may be provisioned: the plan must be
/// visible to the actor at all, and visible within the owning space.
#[async_trait]
pub trait PlanCatalog: Send + Sync {
    /// Resolve a plan
    async fn find_plan(&self, id: PlanId) -> AtriumResult<Option<ServicePlan>>;

    /// Whether the plan is visible to the current actor
    async fn plan_visible_to_actor(
        &self,
        plan: &ServicePlan,
        perms: &dyn PermissionOracle,
    ) -> bool;

    /// Whether the plan is visible within `space`
    async fn plan_visible_in_space(&self, plan: &ServicePlan, space: &Space) -> bool;
}

/// Payload handed to the provisioning engine for a managed instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    /// Requested instance name
    pub name: String,
    /// Owning space of the instance-to-be
    pub space: SpaceId,
    /// The plan to provision from
    pub plan: PlanId,
    /// Broker-specific provisioning parameters
    pub parameters: Option<serde_json::Value>,
    /// Tags to attach to the materialized instance
    pub tags: Vec<String>,
}

/// Failures reported by the provisioning engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The provisioning payload itself is invalid; nothing was
    /// enqueued
    #[error("invalid provisioning payload: {message}")]
    InvalidPayload {
        /// What the engine rejected
        message: String,
    },

    /// The backend does not support parameter retrieval
    #[error("fetching parameters is not supported by this backend")]
    ParametersNotSupported,

    /// The engine itself failed
    #[error("provisioning engine failure: {message}")]
    Failure {
        /// Description of the failure
        message: String,
    },
}

/// The asynchronous provisioning engine for managed instances
///
/// Atrium hands off at enqueue time: it obtains the job handle and
/// performs no polling, retry, or waiting afterwards.
#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Enqueue provisioning of a managed instance, returning the
    /// opaque job handle
    async fn enqueue_provisioning(&self, request: &ProvisionRequest) -> Result<JobId, EngineError>;

    /// Fetch live provisioning parameters for a managed instance
    async fn fetch_parameters(
        &self,
        instance: &ServiceInstance,
    ) -> Result<serde_json::Value, EngineError>;
}

/// Audited actions on service instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Instance created (or provisioning enqueued)
    Create,
    /// Instance fields updated
    Update,
    /// Sharing edges added
    Share,
    /// A sharing edge removed
    Unshare,
}

/// Fire-and-forget audit sink
#[async_trait]
pub trait EventRecorder: Send + Sync {
    /// Record that `actor` performed `action` on `instance`
    async fn record(&self, actor: &ActorInfo, action: AuditAction, instance: &ServiceInstance);
}

/// Feature flags gating instance operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureFlag {
    /// Gates instance creation for actors without global write
    InstanceCreation,
    /// Gates instance sharing for everyone
    InstanceSharing,
}

/// Read-only feature flag store
#[async_trait]
pub trait FeatureFlags: Send + Sync {
    /// Whether `flag` is currently enabled
    async fn enabled(&self, flag: FeatureFlag) -> bool;
}
