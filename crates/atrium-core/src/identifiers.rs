//! Typed identifiers for Atrium entities
//!
//! Every identifier is an opaque UUID newtype so the orchestration
//! layer can never confuse a space for an instance or a plan for a job.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! identifier {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create from a UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

identifier!(
    /// Identifier for a space, the organizational boundary that owns
    /// service instances and gates read/write capability.
    SpaceId,
    "space"
);

identifier!(
    /// Identifier for the organization a space belongs to.
    OrgId,
    "org"
);

identifier!(
    /// Identifier for a service instance.
    InstanceId,
    "instance"
);

identifier!(
    /// Identifier for a service plan referenced by managed instances.
    PlanId,
    "plan"
);

identifier!(
    /// Opaque handle for an in-flight provisioning job. Atrium only
    /// hands the handle back to the caller; job state lives with the
    /// provisioning engine.
    JobId,
    "job"
);

identifier!(
    /// Identifier for the acting user, recorded in audit events.
    UserId,
    "user"
);
