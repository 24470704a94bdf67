//! Creation orchestration end to end: ordered preconditions, the
//! synchronous user-provided path, and the job-backed managed path.

use assert_matches::assert_matches;
use atrium_core::{
    AtriumError, AuditAction, FeatureFlag, InstanceKind, InstanceStore, PlanId, ServicePlan,
    SpaceId,
};
use atrium_instances::Created;
use atrium_testkit::{ScriptedPermissions, TestBed};
use serde_json::json;

fn user_provided_body(space: SpaceId) -> serde_json::Value {
    json!({
        "type": "user-provided",
        "name": "mydb",
        "space": space.uuid(),
        "credentials": { "password": "hunter2" },
        "tags": ["relational"],
    })
}

fn managed_body(space: SpaceId, plan: PlanId) -> serde_json::Value {
    json!({
        "type": "managed",
        "name": "mycache",
        "space": space.uuid(),
        "plan": plan.uuid(),
        "parameters": { "size": "small" },
    })
}

async fn visible_plan(bed: &TestBed, space: SpaceId) -> PlanId {
    let plan = ServicePlan {
        id: PlanId::new(),
        name: "standard".to_string(),
    };
    bed.plans.insert(plan.clone()).await;
    bed.plans.make_visible(plan.id).await;
    bed.plans.make_visible_in(plan.id, space).await;
    plan.id
}

#[tokio::test]
async fn user_provided_instance_materializes_in_the_same_call() {
    let bed = TestBed::new();
    let space = bed.add_space().await;
    let perms = ScriptedPermissions::new()
        .reader_of(space.id)
        .writer_of(space.id);
    let actor = bed.actor();

    let created = bed
        .service
        .create_instance(&user_provided_body(space.id), &actor, &perms)
        .await
        .unwrap();

    let instance = assert_matches!(created, Created::Instance(instance) => instance);
    assert_eq!(instance.name, "mydb");
    assert_eq!(instance.space, space.id);
    assert_eq!(instance.tags, vec!["relational".to_string()]);
    assert_matches!(&instance.kind, InstanceKind::UserProvided { .. });

    // Persisted and audited.
    assert!(bed
        .instances
        .find_instance(instance.id)
        .await
        .unwrap()
        .is_some());
    let records = bed.events.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action, AuditAction::Create);
    assert_eq!(records[0].user, actor.user);
}

#[tokio::test]
async fn managed_creation_returns_only_the_job_handle() {
    let bed = TestBed::new();
    let space = bed.add_space().await;
    let plan = visible_plan(&bed, space.id).await;
    let perms = ScriptedPermissions::new()
        .reader_of(space.id)
        .writer_of(space.id);

    let created = bed
        .service
        .create_instance(&managed_body(space.id, plan), &bed.actor(), &perms)
        .await
        .unwrap();
    assert_eq!(created, Created::Job(bed.engine.job()));

    // The provisioning request was handed off, but no instance
    // materialized in this layer.
    let enqueued = bed.engine.enqueued().await;
    assert_eq!(enqueued.len(), 1);
    assert_eq!(enqueued[0].plan, plan);
    assert_eq!(enqueued[0].space, space.id);
    assert!(bed.instances.list_instances().await.unwrap().is_empty());
}

#[tokio::test]
async fn managed_creation_requires_both_plan_visibility_predicates() {
    let bed = TestBed::new();
    let space = bed.add_space().await;
    let perms = ScriptedPermissions::new()
        .reader_of(space.id)
        .writer_of(space.id);

    // Visible to the actor, but not in the target space.
    let plan = ServicePlan {
        id: PlanId::new(),
        name: "standard".to_string(),
    };
    bed.plans.insert(plan.clone()).await;
    bed.plans.make_visible(plan.id).await;

    let err = bed
        .service
        .create_instance(&managed_body(space.id, plan.id), &bed.actor(), &perms)
        .await
        .unwrap_err();
    assert_matches!(err, AtriumError::Unprocessable { message } if message.contains("service plan"));

    // Visible in the space, but not to the actor.
    let other = ServicePlan {
        id: PlanId::new(),
        name: "premium".to_string(),
    };
    bed.plans.insert(other.clone()).await;
    bed.plans.make_visible_in(other.id, space.id).await;

    let err = bed
        .service
        .create_instance(&managed_body(space.id, other.id), &bed.actor(), &perms)
        .await
        .unwrap_err();
    assert_matches!(err, AtriumError::Unprocessable { .. });

    // Neither failure enqueued a job or materialized an instance.
    assert!(bed.engine.enqueued().await.is_empty());
    assert!(bed.instances.list_instances().await.unwrap().is_empty());
}

#[tokio::test]
async fn unresolved_plan_never_enqueues_a_job() {
    let bed = TestBed::new();
    let space = bed.add_space().await;
    let perms = ScriptedPermissions::new()
        .reader_of(space.id)
        .writer_of(space.id);

    let err = bed
        .service
        .create_instance(&managed_body(space.id, PlanId::new()), &bed.actor(), &perms)
        .await
        .unwrap_err();
    assert_matches!(err, AtriumError::Unprocessable { .. });
    assert!(bed.engine.enqueued().await.is_empty());
}

#[tokio::test]
async fn engine_payload_rejection_surfaces_as_unprocessable() {
    let bed = TestBed::new();
    let space = bed.add_space().await;
    let plan = visible_plan(&bed, space.id).await;
    bed.engine.reject_payloads("name is taken").await;
    let perms = ScriptedPermissions::new()
        .reader_of(space.id)
        .writer_of(space.id);

    let err = bed
        .service
        .create_instance(&managed_body(space.id, plan), &bed.actor(), &perms)
        .await
        .unwrap_err();
    assert_matches!(err, AtriumError::Unprocessable { message } if message == "name is taken");
    assert!(bed.instances.list_instances().await.unwrap().is_empty());
}

#[tokio::test]
async fn creation_flag_gates_non_admins_and_precedes_space_checks() {
    let bed = TestBed::new();
    bed.flags.disable(FeatureFlag::InstanceCreation).await;

    // The flag failure wins even though the space does not resolve.
    let perms = ScriptedPermissions::new();
    let err = bed
        .service
        .create_instance(&user_provided_body(SpaceId::new()), &bed.actor(), &perms)
        .await
        .unwrap_err();
    assert_matches!(err, AtriumError::FeatureDisabled { .. });
}

#[tokio::test]
async fn global_writers_bypass_the_creation_flag() {
    let bed = TestBed::new();
    bed.flags.disable(FeatureFlag::InstanceCreation).await;
    let space = bed.add_space().await;

    let perms = ScriptedPermissions::new().global_writer();
    let created = bed
        .service
        .create_instance(&user_provided_body(space.id), &bed.actor(), &perms)
        .await
        .unwrap();
    assert_matches!(created, Created::Instance(_));
}

#[tokio::test]
async fn unreadable_or_absent_space_is_unprocessable() {
    let bed = TestBed::new();
    let space = bed.add_space().await;

    // Exists but unreadable.
    let perms = ScriptedPermissions::new().writer_of(space.id);
    let err = bed
        .service
        .create_instance(&user_provided_body(space.id), &bed.actor(), &perms)
        .await
        .unwrap_err();
    assert_matches!(&err, AtriumError::Unprocessable { message } if message.contains("Invalid space"));

    // Does not exist.
    let err = bed
        .service
        .create_instance(&user_provided_body(SpaceId::new()), &bed.actor(), &perms)
        .await
        .unwrap_err();
    assert_matches!(&err, AtriumError::Unprocessable { message } if message.contains("Invalid space"));
}

#[tokio::test]
async fn suspended_org_blocks_creation_except_for_global_writers() {
    let bed = TestBed::new();
    let space = bed.add_suspended_space().await;

    let perms = ScriptedPermissions::new()
        .reader_of(space.id)
        .writer_of(space.id);
    let err = bed
        .service
        .create_instance(&user_provided_body(space.id), &bed.actor(), &perms)
        .await
        .unwrap_err();
    assert_matches!(err, AtriumError::Unauthorized { message } if message.contains("suspended"));

    let admin = ScriptedPermissions::new().global_writer();
    let created = bed
        .service
        .create_instance(&user_provided_body(space.id), &bed.actor(), &admin)
        .await
        .unwrap();
    assert_matches!(created, Created::Instance(_));
}

#[tokio::test]
async fn readable_but_unwritable_space_is_unauthorized() {
    let bed = TestBed::new();
    let space = bed.add_space().await;

    let perms = ScriptedPermissions::new().reader_of(space.id);
    let err = bed
        .service
        .create_instance(&user_provided_body(space.id), &bed.actor(), &perms)
        .await
        .unwrap_err();
    assert_matches!(err, AtriumError::Unauthorized { .. });
}

#[tokio::test]
async fn unknown_type_tag_is_invalid_before_any_collaborator() {
    let bed = TestBed::new();
    bed.flags.disable(FeatureFlag::InstanceCreation).await;

    let body = json!({
        "type": "half-managed",
        "name": "mydb",
        "space": SpaceId::new().uuid(),
    });
    let err = bed
        .service
        .create_instance(&body, &bed.actor(), &ScriptedPermissions::new())
        .await
        .unwrap_err();
    // Parse failure wins over the disabled flag.
    assert_matches!(err, AtriumError::InvalidRequest { message } if message.contains("half-managed"));
}
