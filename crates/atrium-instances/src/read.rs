//! Narrow read paths for credentials and provisioning parameters
//!
//! Credentials exist only on user-provided instances and require the
//! elevated secrets capability in the owning space, a strictly
//! stronger predicate than ordinary read. Parameters exist only on
//! managed instances and require ordinary read on the owning space;
//! a backend without parameter support is a distinct not-supported
//! failure, not an authorization one.
//!
//! Both treat a kind mismatch as not-found, the same answer an absent
//! instance gets.

use crate::visibility::can_read_space;
use atrium_core::{
    AtriumError, AtriumResult, EngineError, InstanceKind, PermissionOracle, ProvisioningEngine,
    ServiceInstance, Space,
};

/// Expose the stored credentials of a user-provided instance
pub async fn read_credentials(
    instance: &ServiceInstance,
    owning_space: &Space,
    perms: &dyn PermissionOracle,
) -> AtriumResult<serde_json::Value> {
    let InstanceKind::UserProvided { credentials, .. } = &instance.kind else {
        return Err(AtriumError::not_found("Service instance not found"));
    };

    if !perms
        .can_read_secrets_in_space(owning_space.id, owning_space.organization)
        .await
    {
        return Err(AtriumError::unauthorized(
            "Reading credentials requires the secrets capability in the owning space",
        ));
    }

    Ok(credentials.clone())
}

/// Fetch the live provisioning parameters of a managed instance from
/// its backend
pub async fn read_parameters(
    instance: &ServiceInstance,
    owning_space: &Space,
    engine: &dyn ProvisioningEngine,
    perms: &dyn PermissionOracle,
) -> AtriumResult<serde_json::Value> {
    if !instance.kind.is_managed() {
        return Err(AtriumError::not_found("Service instance not found"));
    }

    if !can_read_space(owning_space, perms).await {
        return Err(AtriumError::unauthorized(
            "Read capability on the owning space is required to fetch parameters",
        ));
    }

    match engine.fetch_parameters(instance).await {
        Ok(parameters) => Ok(parameters),
        Err(EngineError::ParametersNotSupported) => Err(AtriumError::not_supported(
            "This service does not support fetching service instance parameters.",
        )),
        Err(other) => Err(AtriumError::internal(other.to_string())),
    }
}
