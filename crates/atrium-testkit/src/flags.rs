//! Scripted feature flag store

use async_trait::async_trait;
use atrium_core::{FeatureFlag, FeatureFlags};
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Feature flag store answering from an explicit set
#[derive(Debug, Default)]
pub struct StaticFlags {
    enabled: RwLock<HashSet<FeatureFlag>>,
}

impl StaticFlags {
    /// Create a store with every flag disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with every flag enabled
    pub fn all_enabled() -> Self {
        Self {
            enabled: RwLock::new(HashSet::from([
                FeatureFlag::InstanceCreation,
                FeatureFlag::InstanceSharing,
            ])),
        }
    }

    /// Enable a flag
    pub async fn enable(&self, flag: FeatureFlag) {
        self.enabled.write().await.insert(flag);
    }

    /// Disable a flag
    pub async fn disable(&self, flag: FeatureFlag) {
        self.enabled.write().await.remove(&flag);
    }
}

#[async_trait]
impl FeatureFlags for StaticFlags {
    async fn enabled(&self, flag: FeatureFlag) -> bool {
        self.enabled.read().await.contains(&flag)
    }
}
