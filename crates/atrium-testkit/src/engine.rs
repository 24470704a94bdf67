//! Scripted provisioning engine
//!
//! Records every enqueued provision request and answers with a fixed
//! job handle. Can be told to reject payloads as invalid, and serves
//! parameters only when a parameter document was configured —
//! otherwise it reports the backend as unsupporting.

use async_trait::async_trait;
use atrium_core::{EngineError, JobId, ProvisionRequest, ProvisioningEngine, ServiceInstance};
use tokio::sync::RwLock;

/// In-memory provisioning engine double
#[derive(Debug)]
pub struct ScriptedEngine {
    job: JobId,
    reject_with: RwLock<Option<String>>,
    parameters: RwLock<Option<serde_json::Value>>,
    enqueued: RwLock<Vec<ProvisionRequest>>,
}

impl ScriptedEngine {
    /// Create an engine that accepts every payload
    pub fn new() -> Self {
        Self {
            job: JobId::new(),
            reject_with: RwLock::new(None),
            parameters: RwLock::new(None),
            enqueued: RwLock::new(Vec::new()),
        }
    }

    /// The job handle returned for every accepted enqueue
    pub fn job(&self) -> JobId {
        self.job
    }

    /// Reject every payload from now on with the given message
    pub async fn reject_payloads(&self, message: impl Into<String>) {
        *self.reject_with.write().await = Some(message.into());
    }

    /// Serve the given parameter document from now on
    pub async fn support_parameters(&self, parameters: serde_json::Value) {
        *self.parameters.write().await = Some(parameters);
    }

    /// Every provision request accepted so far
    pub async fn enqueued(&self) -> Vec<ProvisionRequest> {
        self.enqueued.read().await.clone()
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProvisioningEngine for ScriptedEngine {
    async fn enqueue_provisioning(&self, request: &ProvisionRequest) -> Result<JobId, EngineError> {
        if let Some(message) = self.reject_with.read().await.clone() {
            return Err(EngineError::InvalidPayload { message });
        }
        self.enqueued.write().await.push(request.clone());
        Ok(self.job)
    }

    async fn fetch_parameters(
        &self,
        _instance: &ServiceInstance,
    ) -> Result<serde_json::Value, EngineError> {
        match self.parameters.read().await.clone() {
            Some(parameters) => Ok(parameters),
            None => Err(EngineError::ParametersNotSupported),
        }
    }
}
