//! # Atrium Core
//!
//! Domain model and collaborator interfaces for the Atrium service
//! instance orchestration layer: typed identifiers, the space and
//! service instance model, the unified error type, and the effect
//! traits implemented by external collaborators (permission oracle,
//! stores, provisioning engine, event recorder, feature flags).

pub mod effects;
pub mod errors;
pub mod identifiers;
pub mod instance;
pub mod space;

pub use effects::{
    ActorInfo, AuditAction, EngineError, EventRecorder, FeatureFlag, FeatureFlags, InstanceStore,
    PermissionOracle, PlanCatalog, ProvisionRequest, ProvisioningEngine, ServicePlan, SpaceStore,
};
pub use errors::{AtriumError, AtriumResult};
pub use identifiers::{InstanceId, JobId, OrgId, PlanId, SpaceId, UserId};
pub use instance::{InstanceKind, ServiceInstance};
pub use space::Space;
