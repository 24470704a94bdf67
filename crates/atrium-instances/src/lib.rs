//! # Atrium Instances
//!
//! Authorization-gated orchestration of shareable service instances.
//! Every operation resolves its capability checks against the
//! permission oracle before acting: reads pass through the visibility
//! gate, mutations additionally require write capability on the
//! owning space, and batch sharing validates every target and reports
//! all failures in one aggregated error.
//!
//! The layer is request-scoped and stateless between requests; the
//! oracle and actor identity are explicit parameters on every call.
//! [`InstanceService`] is the transport-agnostic outward surface.

pub mod aggregate;
pub mod create;
pub mod messages;
pub mod read;
pub mod service;
pub mod share;
pub mod update;
pub mod visibility;

pub use aggregate::{aggregate_share_failures, ShareFailure, ShareFailureCategory};
pub use create::{CreateOrchestrator, Created};
pub use messages::{
    CreateInstanceRequest, CreateManagedRequest, CreateUserProvidedRequest, ShareTargets,
    UpdateInstanceRequest,
};
pub use service::InstanceService;
pub use share::ShareOrchestrator;
pub use update::UpdateOrchestrator;
pub use visibility::{can_read_instance, can_read_space, can_write_space};
