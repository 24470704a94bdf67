//! The service instance model
//!
//! A service instance belongs to exactly one owning space and may be
//! shared into any number of other spaces. The owning space is fixed
//! at creation; the shared-space set is mutated only through the
//! sharing orchestrator. The two are disjoint at all times: the
//! mutators below refuse to add the owning space as a sharing edge,
//! so the invariant holds by construction.

use crate::identifiers::{InstanceId, PlanId, SpaceId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Type-specific payload of a service instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstanceKind {
    /// Fully materialized within the request that created it; carries
    /// caller-supplied credentials
    UserProvided {
        /// Opaque credential document, exposed only through the
        /// elevated secrets read path
        credentials: serde_json::Value,
        /// Optional syslog drain endpoint
        syslog_drain_url: Option<String>,
        /// Optional route service endpoint
        route_service_url: Option<String>,
    },

    /// Materialized asynchronously by the provisioning engine against
    /// a referenced service plan
    Managed {
        /// The plan this instance is provisioned from
        plan: PlanId,
    },
}

impl InstanceKind {
    /// Whether this is a user-provided instance
    pub fn is_user_provided(&self) -> bool {
        matches!(self, Self::UserProvided { .. })
    }

    /// Whether this is a managed instance
    pub fn is_managed(&self) -> bool {
        matches!(self, Self::Managed { .. })
    }
}

/// A shareable, typed service instance owned by one space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Instance identity
    pub id: InstanceId,
    /// Human-facing name, unique within the owning space
    pub name: String,
    /// The owning space; immutable after creation
    pub space: SpaceId,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Type-specific payload
    pub kind: InstanceKind,
    // Never contains `space`; mutate only through the methods below.
    shared_spaces: BTreeSet<SpaceId>,
}

impl ServiceInstance {
    /// Create an instance owned by `space` with the given payload
    pub fn new(name: impl Into<String>, space: SpaceId, kind: InstanceKind) -> Self {
        Self {
            id: InstanceId::new(),
            name: name.into(),
            space,
            tags: Vec::new(),
            kind,
            shared_spaces: BTreeSet::new(),
        }
    }

    /// Create a user-provided instance owned by `space`
    pub fn user_provided(
        name: impl Into<String>,
        space: SpaceId,
        credentials: serde_json::Value,
    ) -> Self {
        Self::new(
            name,
            space,
            InstanceKind::UserProvided {
                credentials,
                syslog_drain_url: None,
                route_service_url: None,
            },
        )
    }

    /// Create a managed instance owned by `space`, provisioned from
    /// `plan`
    pub fn managed(name: impl Into<String>, space: SpaceId, plan: PlanId) -> Self {
        Self::new(name, space, InstanceKind::Managed { plan })
    }

    /// Attach tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// The spaces this instance is currently shared into
    pub fn shared_spaces(&self) -> &BTreeSet<SpaceId> {
        &self.shared_spaces
    }

    /// Whether a sharing edge to `space` exists
    pub fn is_shared_into(&self, space: SpaceId) -> bool {
        self.shared_spaces.contains(&space)
    }

    /// Every space the instance is visible from: the owning space plus
    /// all shared spaces
    pub fn visible_spaces(&self) -> impl Iterator<Item = SpaceId> + '_ {
        std::iter::once(self.space).chain(self.shared_spaces.iter().copied())
    }

    /// Add sharing edges to `targets`. Adding an existing edge is a
    /// no-op; the owning space is never added.
    pub fn add_shared_spaces(&mut self, targets: &[SpaceId]) {
        for &target in targets {
            if target != self.space {
                self.shared_spaces.insert(target);
            }
        }
    }

    /// Remove the sharing edge to `target`. Returns whether an edge
    /// was present.
    pub fn remove_shared_space(&mut self, target: SpaceId) -> bool {
        self.shared_spaces.remove(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn owning_space_never_enters_shared_set() {
        let owner = SpaceId::new();
        let other = SpaceId::new();
        let mut instance = ServiceInstance::user_provided("db", owner, json!({}));

        instance.add_shared_spaces(&[owner, other]);
        assert!(!instance.is_shared_into(owner));
        assert!(instance.is_shared_into(other));
    }

    #[test]
    fn sharing_is_idempotent() {
        let owner = SpaceId::new();
        let target = SpaceId::new();
        let mut instance = ServiceInstance::managed("cache", owner, PlanId::new());

        instance.add_shared_spaces(&[target]);
        instance.add_shared_spaces(&[target]);
        assert_eq!(instance.shared_spaces().len(), 1);
    }

    #[test]
    fn unshare_reports_edge_presence() {
        let owner = SpaceId::new();
        let target = SpaceId::new();
        let mut instance = ServiceInstance::user_provided("db", owner, json!({}));

        instance.add_shared_spaces(&[target]);
        assert!(instance.remove_shared_space(target));
        assert!(!instance.remove_shared_space(target));
    }

    #[test]
    fn visible_spaces_unions_owner_and_shared() {
        let owner = SpaceId::new();
        let target = SpaceId::new();
        let mut instance = ServiceInstance::user_provided("db", owner, json!({}));
        instance.add_shared_spaces(&[target]);

        let visible: Vec<_> = instance.visible_spaces().collect();
        assert!(visible.contains(&owner));
        assert!(visible.contains(&target));
        assert_eq!(visible.len(), 2);
    }
}
