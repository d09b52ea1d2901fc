use chrono::{Duration, Utc};

use lifecycle_core::domain::{
    AppType, ChildOf, ClientApp, EntityStatus, HasLifecycle, LifecycleState, SoftDeletable,
    SubscriptionPlan, Tenant,
};
use lifecycle_core::{ErrorKind, SoftDeleteError};
use lifecycle_shared::new_id;

fn cycle<T: SoftDeletable>(record: &mut T) {
    let remover = new_id();
    let restorer = new_id();
    let created = (record.lifecycle().created_at(), record.lifecycle().created_by());

    assert!(record.deactivate(remover));
    assert_eq!(record.status(), EntityStatus::Inactive);
    assert_eq!(record.lifecycle().deleted_by(), Some(remover));
    assert!(record.lifecycle().check_invariants());

    assert!(record.reactivate(restorer));
    assert_eq!(record.status(), EntityStatus::Active);
    assert_eq!(record.lifecycle().updated_by(), Some(restorer));
    assert_eq!((record.lifecycle().created_at(), record.lifecycle().created_by()), created);
    assert!(record.lifecycle().check_invariants());
}

#[test]
fn tenant_and_client_app_share_one_lifecycle() {
    let owner = new_id();
    let mut tenant = Tenant::new("Acme".to_string(), "acme".to_string(), 50, SubscriptionPlan::Premium, Some(owner)).unwrap();
    let mut app = ClientApp::new(tenant.id, "Console".to_string(), "acme-console".to_string(), AppType::Web, Some(owner)).unwrap();

    cycle(&mut tenant);
    cycle(&mut app);
    assert_eq!(app.parent_id(), tenant.id);
}

#[test]
fn stored_state_must_be_consistent() {
    let now = Utc::now();
    let actor = new_id();

    assert!(LifecycleState::restore(EntityStatus::Inactive, None, None, now, None, now, None).is_none());
    assert!(LifecycleState::restore(EntityStatus::Active, Some(now), Some(actor), now, None, now, None).is_none());

    let deleted = LifecycleState::restore(
        EntityStatus::Inactive,
        Some(now),
        Some(actor),
        now - Duration::days(3),
        None,
        now,
        Some(actor),
    )
    .unwrap();
    assert!(deleted.is_deleted());
}

#[test]
fn errors_expose_kind_and_entity() {
    let id = new_id();
    let errors = [
        (SoftDeleteError::entity_not_found(id), ErrorKind::EntityNotFound),
        (SoftDeleteError::entity_already_deleted(id), ErrorKind::EntityAlreadyDeleted),
        (SoftDeleteError::entity_not_deleted(id), ErrorKind::EntityNotDeleted),
        (SoftDeleteError::concurrent_modification(id), ErrorKind::ConcurrentModification),
        (SoftDeleteError::cascading_constraint_violation(id, "2 active client apps"), ErrorKind::CascadingConstraintViolation),
    ];

    for (err, kind) in errors {
        assert_eq!(err.kind(), kind);
        assert_eq!(err.entity_id(), Some(id));
        assert!(!err.message().is_empty());
        assert_eq!(err.to_string(), err.message());
    }
}
