//! Scripted plan catalog
//!
//! Plans and their two visibility predicates are configured as
//! explicit sets: a plan is visible to the scripted actor iff it was
//! marked so, and visible in a space iff the (plan, space) pair was
//! marked so. The oracle argument is ignored; real catalogs derive
//! actor visibility from it.

use async_trait::async_trait;
use atrium_core::{
    AtriumResult, PermissionOracle, PlanCatalog, PlanId, ServicePlan, Space, SpaceId,
};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// In-memory plan catalog with scripted visibility
#[derive(Debug, Default)]
pub struct StaticPlans {
    plans: RwLock<HashMap<PlanId, ServicePlan>>,
    visible_to_actor: RwLock<HashSet<PlanId>>,
    visible_in_space: RwLock<HashSet<(PlanId, SpaceId)>>,
}

impl StaticPlans {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plan
    pub async fn insert(&self, plan: ServicePlan) {
        self.plans.write().await.insert(plan.id, plan);
    }

    /// Mark a plan visible to the actor
    pub async fn make_visible(&self, plan: PlanId) {
        self.visible_to_actor.write().await.insert(plan);
    }

    /// Mark a plan visible within a space
    pub async fn make_visible_in(&self, plan: PlanId, space: SpaceId) {
        self.visible_in_space.write().await.insert((plan, space));
    }
}

#[async_trait]
impl PlanCatalog for StaticPlans {
    async fn find_plan(&self, id: PlanId) -> AtriumResult<Option<ServicePlan>> {
        Ok(self.plans.read().await.get(&id).cloned())
    }

    async fn plan_visible_to_actor(
        &self,
        plan: &ServicePlan,
        _perms: &dyn PermissionOracle,
    ) -> bool {
        self.visible_to_actor.read().await.contains(&plan.id)
    }

    async fn plan_visible_in_space(&self, plan: &ServicePlan, space: &Space) -> bool {
        self.visible_in_space
            .read()
            .await
            .contains(&(plan.id, space.id))
    }
}
