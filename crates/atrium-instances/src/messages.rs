//! Request messages and their validation
//!
//! Each request body is validated in a single pass into a closed,
//! typed value: creation parses straight into a tagged union keyed on
//! the `type` discriminator, updates reject unknown fields before any
//! orchestrator runs, and share targets are deduplicated and required
//! to be non-empty. All parse failures are `InvalidRequest` and are
//! reported before any collaborator is consulted.

use atrium_core::{AtriumError, AtriumResult, PlanId, SpaceId};
use serde::Deserialize;
use serde_json::Value;

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Creation request for a user-provided instance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserProvidedRequest {
    /// Requested instance name
    pub name: String,
    /// Owning space
    pub space: SpaceId,
    /// Credential document stored with the instance
    #[serde(default = "empty_object")]
    pub credentials: Value,
    /// Optional syslog drain endpoint
    #[serde(default)]
    pub syslog_drain_url: Option<String>,
    /// Optional route service endpoint
    #[serde(default)]
    pub route_service_url: Option<String>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Creation request for a managed instance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateManagedRequest {
    /// Requested instance name
    pub name: String,
    /// Owning space
    pub space: SpaceId,
    /// The plan to provision from
    pub plan: PlanId,
    /// Broker-specific provisioning parameters
    #[serde(default)]
    pub parameters: Option<Value>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A validated creation request, one variant per instance type
///
/// The `type` discriminator is closed: anything other than
/// `user-provided` or `managed` is rejected as an invalid request.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateInstanceRequest {
    /// `type: user-provided`
    UserProvided(CreateUserProvidedRequest),
    /// `type: managed`
    Managed(CreateManagedRequest),
}

impl CreateInstanceRequest {
    /// Validate a creation body in one pass
    pub fn from_body(body: &Value) -> AtriumResult<Self> {
        let fields = body
            .as_object()
            .ok_or_else(|| AtriumError::invalid_request("request body must be an object"))?;

        let tag = fields
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AtriumError::invalid_request("type must be one of 'user-provided', 'managed'")
            })?
            .to_string();

        let mut rest = fields.clone();
        rest.remove("type");
        let rest = Value::Object(rest);

        let request = match tag.as_str() {
            "user-provided" => Self::UserProvided(
                serde_json::from_value(rest)
                    .map_err(|err| AtriumError::invalid_request(err.to_string()))?,
            ),
            "managed" => Self::Managed(
                serde_json::from_value(rest)
                    .map_err(|err| AtriumError::invalid_request(err.to_string()))?,
            ),
            other => {
                return Err(AtriumError::invalid_request(format!(
                    "unknown service instance type '{other}'"
                )))
            }
        };

        if request.name().trim().is_empty() {
            return Err(AtriumError::invalid_request("name cannot be blank"));
        }
        Ok(request)
    }

    /// The requested instance name
    pub fn name(&self) -> &str {
        match self {
            Self::UserProvided(request) => &request.name,
            Self::Managed(request) => &request.name,
        }
    }

    /// The requested owning space
    pub fn space(&self) -> SpaceId {
        match self {
            Self::UserProvided(request) => request.space,
            Self::Managed(request) => request.space,
        }
    }
}

/// A validated partial update
///
/// Unknown fields are rejected here, before the update orchestrator is
/// reached. Credential and drain fields only apply to user-provided
/// instances; the orchestrator enforces that.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateInstanceRequest {
    /// New instance name
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement tag list
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Replacement credential document (user-provided only)
    #[serde(default)]
    pub credentials: Option<Value>,
    /// New syslog drain endpoint (user-provided only)
    #[serde(default)]
    pub syslog_drain_url: Option<String>,
    /// New route service endpoint (user-provided only)
    #[serde(default)]
    pub route_service_url: Option<String>,
}

impl UpdateInstanceRequest {
    /// Validate an update body
    pub fn from_body(body: &Value) -> AtriumResult<Self> {
        let patch: Self = serde_json::from_value(body.clone())
            .map_err(|err| AtriumError::invalid_request(err.to_string()))?;
        if matches!(&patch.name, Some(name) if name.trim().is_empty()) {
            return Err(AtriumError::invalid_request("name cannot be blank"));
        }
        Ok(patch)
    }

    /// Whether the patch touches fields that only exist on
    /// user-provided instances
    pub fn touches_user_provided_fields(&self) -> bool {
        self.credentials.is_some()
            || self.syslog_drain_url.is_some()
            || self.route_service_url.is_some()
    }
}

/// The deduplicated, non-empty list of spaces targeted by one share
/// request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareTargets {
    ids: Vec<SpaceId>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RelationshipBody {
    data: Vec<RelationshipEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RelationshipEntry {
    guid: SpaceId,
}

impl ShareTargets {
    /// Build targets from an explicit id list, deduplicating while
    /// preserving request order
    pub fn new(ids: Vec<SpaceId>) -> AtriumResult<Self> {
        if ids.is_empty() {
            return Err(AtriumError::invalid_request(
                "at least one target space is required",
            ));
        }
        let mut deduped = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        Ok(Self { ids: deduped })
    }

    /// Validate a to-many relationship body: `{"data": [{"guid": …}]}`
    pub fn from_body(body: &Value) -> AtriumResult<Self> {
        let parsed: RelationshipBody = serde_json::from_value(body.clone())
            .map_err(|err| AtriumError::invalid_request(err.to_string()))?;
        Self::new(parsed.data.into_iter().map(|entry| entry.guid).collect())
    }

    /// The requested target spaces in request order
    pub fn ids(&self) -> &[SpaceId] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn create_dispatches_on_type_tag() {
        let space = SpaceId::new();
        let plan = PlanId::new();

        let body = json!({
            "type": "user-provided",
            "name": "db",
            "space": space.uuid(),
            "credentials": {"password": "hunter2"},
        });
        assert_matches!(
            CreateInstanceRequest::from_body(&body),
            Ok(CreateInstanceRequest::UserProvided(request)) if request.space == space
        );

        let body = json!({
            "type": "managed",
            "name": "db",
            "space": space.uuid(),
            "plan": plan.uuid(),
        });
        assert_matches!(
            CreateInstanceRequest::from_body(&body),
            Ok(CreateInstanceRequest::Managed(request)) if request.plan == plan
        );
    }

    #[test]
    fn create_rejects_unknown_type_tag() {
        let body = json!({
            "type": "half-managed",
            "name": "db",
            "space": SpaceId::new().uuid(),
        });
        assert_matches!(
            CreateInstanceRequest::from_body(&body),
            Err(AtriumError::InvalidRequest { message }) if message.contains("half-managed")
        );
    }

    #[test]
    fn create_rejects_missing_tag_and_blank_name() {
        let body = json!({ "name": "db", "space": SpaceId::new().uuid() });
        assert_matches!(
            CreateInstanceRequest::from_body(&body),
            Err(AtriumError::InvalidRequest { .. })
        );

        let body = json!({
            "type": "user-provided",
            "name": "   ",
            "space": SpaceId::new().uuid(),
        });
        assert_matches!(
            CreateInstanceRequest::from_body(&body),
            Err(AtriumError::InvalidRequest { message }) if message.contains("blank")
        );
    }

    #[test]
    fn create_rejects_unknown_fields() {
        let body = json!({
            "type": "user-provided",
            "name": "db",
            "space": SpaceId::new().uuid(),
            "plan": PlanId::new().uuid(),
        });
        assert_matches!(
            CreateInstanceRequest::from_body(&body),
            Err(AtriumError::InvalidRequest { .. })
        );
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let body = json!({ "name": "db2", "favourite_colour": "teal" });
        assert_matches!(
            UpdateInstanceRequest::from_body(&body),
            Err(AtriumError::InvalidRequest { .. })
        );
    }

    #[test]
    fn update_accepts_partial_patches() {
        let body = json!({ "tags": ["prod"] });
        let patch = UpdateInstanceRequest::from_body(&body).unwrap();
        assert_eq!(patch.tags, Some(vec!["prod".to_string()]));
        assert!(patch.name.is_none());
        assert!(!patch.touches_user_provided_fields());
    }

    #[test]
    fn share_targets_deduplicate_and_require_non_empty() {
        let a = SpaceId::new();
        let b = SpaceId::new();
        let targets = ShareTargets::new(vec![a, b, a]).unwrap();
        assert_eq!(targets.ids(), &[a, b]);

        assert_matches!(
            ShareTargets::new(vec![]),
            Err(AtriumError::InvalidRequest { .. })
        );
        assert_matches!(
            ShareTargets::from_body(&json!({ "data": [] })),
            Err(AtriumError::InvalidRequest { .. })
        );
    }

    #[test]
    fn share_targets_parse_relationship_body() {
        let a = SpaceId::new();
        let body = json!({ "data": [{ "guid": a.uuid() }] });
        let targets = ShareTargets::from_body(&body).unwrap();
        assert_eq!(targets.ids(), &[a]);
    }
}
