//! Spaces: the organizational boundaries that own service instances
//!
//! Spaces are read-only to this layer. They are resolved through the
//! [`SpaceStore`](crate::effects::SpaceStore) collaborator and only
//! ever consulted for their identity, parent organization, and
//! suspension status.

use crate::identifiers::{OrgId, SpaceId};
use serde::{Deserialize, Serialize};

/// A space: owns service instances and gates capability checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Space identity
    pub id: SpaceId,
    /// Parent organization
    pub organization: OrgId,
    /// Whether the parent organization is suspended. Suspension blocks
    /// instance creation for everyone without global write capability.
    pub suspended: bool,
}

impl Space {
    /// Create a space in an active organization
    pub fn new(id: SpaceId, organization: OrgId) -> Self {
        Self {
            id,
            organization,
            suspended: false,
        }
    }

    /// Mark the parent organization suspended
    pub fn suspended(mut self) -> Self {
        self.suspended = true;
        self
    }

    /// Whether the parent organization is suspended
    pub fn in_suspended_org(&self) -> bool {
        self.suspended
    }
}
