//! The visibility gate
//!
//! A service instance is readable by an actor iff the actor can read
//! from its owning space or from any space it is shared into. Every
//! read and every mutation that loads an instance passes through
//! [`can_read_instance`] first; the single-space delegations are
//! reused by the orchestrators.

use atrium_core::{AtriumResult, PermissionOracle, ServiceInstance, Space, SpaceStore};

/// Whether `instance` is readable by the current actor: read
/// capability on the owning space or on at least one shared space.
/// No side effects.
pub async fn can_read_instance(
    instance: &ServiceInstance,
    spaces: &dyn SpaceStore,
    perms: &dyn PermissionOracle,
) -> AtriumResult<bool> {
    let visible: Vec<_> = instance.visible_spaces().collect();
    for space in spaces.find_spaces(&visible).await? {
        if can_read_space(&space, perms).await {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether the actor can read from `space`, scoped by its parent
/// organization
pub async fn can_read_space(space: &Space, perms: &dyn PermissionOracle) -> bool {
    perms.can_read_from_space(space.id, space.organization).await
}

/// Whether the actor can write to `space`
pub async fn can_write_space(space: &Space, perms: &dyn PermissionOracle) -> bool {
    perms.can_write_to_space(space.id).await
}
