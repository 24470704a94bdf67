//! In-memory space and instance stores
//!
//! Each store keeps its map behind one `tokio::sync::RwLock`, so every
//! mutation — including sharing-edge insertion and removal — is a
//! single atomic write, matching the atomicity the orchestration layer
//! requires of the real persistence layer.

use async_trait::async_trait;
use atrium_core::{
    AtriumError, AtriumResult, InstanceId, InstanceStore, ServiceInstance, Space, SpaceId,
    SpaceStore,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory space store
#[derive(Debug, Default)]
pub struct InMemorySpaces {
    spaces: RwLock<HashMap<SpaceId, Space>>,
}

impl InMemorySpaces {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a space
    pub async fn insert(&self, space: Space) {
        self.spaces.write().await.insert(space.id, space);
    }
}

#[async_trait]
impl SpaceStore for InMemorySpaces {
    async fn find_space(&self, id: SpaceId) -> AtriumResult<Option<Space>> {
        Ok(self.spaces.read().await.get(&id).cloned())
    }

    async fn find_spaces(&self, ids: &[SpaceId]) -> AtriumResult<Vec<Space>> {
        let spaces = self.spaces.read().await;
        Ok(ids.iter().filter_map(|id| spaces.get(id).cloned()).collect())
    }
}

/// In-memory instance store
#[derive(Debug, Default)]
pub struct InMemoryInstances {
    instances: RwLock<HashMap<InstanceId, ServiceInstance>>,
}

impl InMemoryInstances {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InstanceStore for InMemoryInstances {
    async fn find_instance(&self, id: InstanceId) -> AtriumResult<Option<ServiceInstance>> {
        Ok(self.instances.read().await.get(&id).cloned())
    }

    async fn list_instances(&self) -> AtriumResult<Vec<ServiceInstance>> {
        let mut all: Vec<_> = self.instances.read().await.values().cloned().collect();
        all.sort_by_key(|instance| instance.id);
        Ok(all)
    }

    async fn persist(&self, instance: &ServiceInstance) -> AtriumResult<()> {
        self.instances
            .write()
            .await
            .insert(instance.id, instance.clone());
        Ok(())
    }

    async fn add_shared_spaces(
        &self,
        id: InstanceId,
        targets: &[SpaceId],
    ) -> AtriumResult<ServiceInstance> {
        let mut instances = self.instances.write().await;
        let instance = instances
            .get_mut(&id)
            .ok_or_else(|| AtriumError::not_found(format!("service instance {id}")))?;
        instance.add_shared_spaces(targets);
        Ok(instance.clone())
    }

    async fn remove_shared_space(
        &self,
        id: InstanceId,
        target: SpaceId,
    ) -> AtriumResult<ServiceInstance> {
        let mut instances = self.instances.write().await;
        let instance = instances
            .get_mut(&id)
            .ok_or_else(|| AtriumError::not_found(format!("service instance {id}")))?;
        instance.remove_shared_space(target);
        Ok(instance.clone())
    }
}
