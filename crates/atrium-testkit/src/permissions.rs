//! Scripted permission oracle
//!
//! Answers capability queries from per-space sets configured up
//! front. Global read satisfies every per-space read query and global
//! write satisfies every per-space write and secrets query; the
//! per-space sets are otherwise independent, so a writer is not
//! implicitly a reader.

use async_trait::async_trait;
use atrium_core::{OrgId, PermissionOracle, SpaceId};
use std::collections::HashSet;

/// A permission oracle bound to one scripted actor
#[derive(Debug, Clone, Default)]
pub struct ScriptedPermissions {
    read_globally: bool,
    write_globally: bool,
    readable: HashSet<SpaceId>,
    writable: HashSet<SpaceId>,
    secrets: HashSet<SpaceId>,
}

impl ScriptedPermissions {
    /// An actor with no capabilities at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant global read
    pub fn global_reader(mut self) -> Self {
        self.read_globally = true;
        self
    }

    /// Grant global write (and global read)
    pub fn global_writer(mut self) -> Self {
        self.read_globally = true;
        self.write_globally = true;
        self
    }

    /// Grant read in `space`
    pub fn reader_of(mut self, space: SpaceId) -> Self {
        self.readable.insert(space);
        self
    }

    /// Grant write in `space`
    pub fn writer_of(mut self, space: SpaceId) -> Self {
        self.writable.insert(space);
        self
    }

    /// Grant the elevated secrets-read capability in `space`
    pub fn secrets_reader_of(mut self, space: SpaceId) -> Self {
        self.secrets.insert(space);
        self
    }
}

#[async_trait]
impl PermissionOracle for ScriptedPermissions {
    async fn can_read_globally(&self) -> bool {
        self.read_globally
    }

    async fn can_write_globally(&self) -> bool {
        self.write_globally
    }

    async fn can_read_from_space(&self, space: SpaceId, _org: OrgId) -> bool {
        self.read_globally || self.readable.contains(&space)
    }

    async fn can_write_to_space(&self, space: SpaceId) -> bool {
        self.write_globally || self.writable.contains(&space)
    }

    async fn can_read_secrets_in_space(&self, space: SpaceId, _org: OrgId) -> bool {
        self.write_globally || self.secrets.contains(&space)
    }
}
