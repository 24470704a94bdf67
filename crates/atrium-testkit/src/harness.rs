//! Pre-wired service fixture

use crate::{
    InMemoryInstances, InMemorySpaces, RecordingEvents, ScriptedEngine, StaticFlags, StaticPlans,
};
use atrium_core::{ActorInfo, OrgId, Space, SpaceId, UserId};
use atrium_instances::InstanceService;
use std::sync::Arc;

/// An [`InstanceService`] wired over in-memory collaborators, with
/// handles to each collaborator for scripting and inspection.
///
/// Both feature flags start enabled; disable them per test through
/// [`TestBed::flags`].
pub struct TestBed {
    /// Space store handle
    pub spaces: Arc<InMemorySpaces>,
    /// Instance store handle
    pub instances: Arc<InMemoryInstances>,
    /// Plan catalog handle
    pub plans: Arc<StaticPlans>,
    /// Provisioning engine handle
    pub engine: Arc<ScriptedEngine>,
    /// Audit sink handle
    pub events: Arc<RecordingEvents>,
    /// Feature flag handle
    pub flags: Arc<StaticFlags>,
    /// The service under test
    pub service: InstanceService,
}

impl TestBed {
    /// Wire a fresh service over empty collaborators
    pub fn new() -> Self {
        let spaces = Arc::new(InMemorySpaces::new());
        let instances = Arc::new(InMemoryInstances::new());
        let plans = Arc::new(StaticPlans::new());
        let engine = Arc::new(ScriptedEngine::new());
        let events = Arc::new(RecordingEvents::new());
        let flags = Arc::new(StaticFlags::all_enabled());

        let service = InstanceService::new(
            spaces.clone(),
            instances.clone(),
            plans.clone(),
            engine.clone(),
            events.clone(),
            flags.clone(),
        );

        Self {
            spaces,
            instances,
            plans,
            engine,
            events,
            flags,
            service,
        }
    }

    /// Create and store a space in a fresh active organization
    pub async fn add_space(&self) -> Space {
        let space = Space::new(SpaceId::new(), OrgId::new());
        self.spaces.insert(space.clone()).await;
        space
    }

    /// Create and store a space whose organization is suspended
    pub async fn add_suspended_space(&self) -> Space {
        let space = Space::new(SpaceId::new(), OrgId::new()).suspended();
        self.spaces.insert(space.clone()).await;
        space
    }

    /// A fresh actor identity
    pub fn actor(&self) -> ActorInfo {
        ActorInfo::new(UserId::new())
    }
}

impl Default for TestBed {
    fn default() -> Self {
        Self::new()
    }
}
