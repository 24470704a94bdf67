//! Recording audit sink

use async_trait::async_trait;
use atrium_core::{ActorInfo, AuditAction, EventRecorder, InstanceId, ServiceInstance, UserId};
use tokio::sync::RwLock;

/// One recorded audit event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// The acting user
    pub user: UserId,
    /// What they did
    pub action: AuditAction,
    /// The instance it happened to
    pub instance: InstanceId,
}

/// Event recorder that keeps everything it sees
#[derive(Debug, Default)]
pub struct RecordingEvents {
    records: RwLock<Vec<AuditRecord>>,
}

impl RecordingEvents {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event recorded so far, in order
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl EventRecorder for RecordingEvents {
    async fn record(&self, actor: &ActorInfo, action: AuditAction, instance: &ServiceInstance) {
        self.records.write().await.push(AuditRecord {
            user: actor.user,
            action,
            instance: instance.id,
        });
    }
}
