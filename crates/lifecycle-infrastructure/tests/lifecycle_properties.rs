use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::future::join_all;

use lifecycle_core::domain::{AppType, ClientApp, HasLifecycle, SubscriptionPlan, Tenant};
use lifecycle_core::error::ErrorKind;
use lifecycle_core::policy::{ActorRole, AllowAll, NoDependents, RoleBasedPolicy};
use lifecycle_core::repositories::SoftDeleteRepository;
use lifecycle_core::services::SoftDeleteService;
use lifecycle_infrastructure::{ActiveChildrenGuard, InMemorySoftDeleteRepository};
use lifecycle_shared::{new_id, EntityId};

type TenantService<P, G> = SoftDeleteService<Tenant, InMemorySoftDeleteRepository<Tenant>, P, G>;

fn tenant(name: &str, creator: EntityId) -> Tenant {
    Tenant::new(name.to_string(), name.to_lowercase(), 25, SubscriptionPlan::Basic, Some(creator)).unwrap()
}

async fn seeded(names: &[&str]) -> (Arc<InMemorySoftDeleteRepository<Tenant>>, Vec<Tenant>, EntityId) {
    let repo = Arc::new(InMemorySoftDeleteRepository::<Tenant>::new());
    let creator = new_id();
    let mut out = Vec::new();
    for name in names {
        out.push(repo.insert(&tenant(name, creator)).await.unwrap());
    }
    (repo, out, creator)
}

fn open_service(repo: Arc<InMemorySoftDeleteRepository<Tenant>>) -> TenantService<AllowAll, NoDependents> {
    SoftDeleteService::new(repo, Arc::new(AllowAll), Arc::new(NoDependents))
}

async fn assert_coupling(repo: &InMemorySoftDeleteRepository<Tenant>) {
    for t in repo.find_all_including_deleted().await.unwrap() {
        assert!(t.lifecycle().check_invariants(), "invariant broken for {}", t.id);
        assert_eq!(t.is_active(), t.lifecycle().deleted_at().is_none());
        assert_eq!(t.is_active(), t.lifecycle().deleted_by().is_none());
    }
}

#[tokio::test]
async fn status_and_audit_fields_stay_coupled() {
    let (repo, tenants, _) = seeded(&["Alpha", "Bravo", "Charlie"]).await;
    let svc = open_service(repo.clone());
    let actor = new_id();
    let ids: Vec<EntityId> = tenants.iter().map(|t| t.id).collect();

    svc.soft_delete(&ids[0], &actor).await.unwrap();
    assert_coupling(&repo).await;
    svc.bulk_soft_delete(&ids, &actor).await.unwrap();
    assert_coupling(&repo).await;
    svc.reactivate(&ids[1], &actor).await.unwrap();
    assert_coupling(&repo).await;
    svc.bulk_reactivate(&ids, &actor).await.unwrap();
    assert_coupling(&repo).await;
}

#[tokio::test]
async fn second_soft_delete_is_a_no_op() {
    let (repo, tenants, _) = seeded(&["Alpha"]).await;
    let svc = open_service(repo.clone());
    let id = tenants[0].id;
    let first = new_id();

    assert!(svc.soft_delete(&id, &first).await.unwrap());
    let after_first = repo.find_including_deleted(&id).await.unwrap().unwrap();

    assert!(!svc.soft_delete(&id, &new_id()).await.unwrap());
    let after_second = repo.find_including_deleted(&id).await.unwrap().unwrap();

    assert_eq!(after_second.lifecycle().deleted_at(), after_first.lifecycle().deleted_at());
    assert_eq!(after_second.lifecycle().deleted_by(), Some(first));
}

#[tokio::test]
async fn strict_soft_delete_reports_already_deleted() {
    let (repo, tenants, _) = seeded(&["Alpha"]).await;
    let svc = open_service(repo);
    let id = tenants[0].id;

    svc.soft_delete_strict(&id, &new_id()).await.unwrap();
    let err = svc.soft_delete_strict(&id, &new_id()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EntityAlreadyDeleted);

    let err = svc.soft_delete_strict(&new_id(), &new_id()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EntityNotFound);
}

#[tokio::test]
async fn round_trip_restores_active_state() {
    let (repo, tenants, creator) = seeded(&["Alpha"]).await;
    let svc = open_service(repo.clone());
    let seeded_tenant = &tenants[0];
    let a = new_id();
    let b = new_id();

    assert!(svc.soft_delete(&seeded_tenant.id, &a).await.unwrap());
    assert!(svc.is_deleted(&seeded_tenant.id).await.unwrap());
    assert!(svc.reactivate(&seeded_tenant.id, &b).await.unwrap());

    let restored = repo.find_active(&seeded_tenant.id).await.unwrap().unwrap();
    let life = restored.lifecycle();
    assert!(restored.is_active());
    assert!(life.deleted_at().is_none());
    assert!(life.deleted_by().is_none());
    assert_eq!(life.updated_by(), Some(b));
    assert_eq!(life.created_at(), seeded_tenant.lifecycle().created_at());
    assert_eq!(life.created_by(), Some(creator));
    assert!(life.updated_at() > seeded_tenant.lifecycle().updated_at());

    let err = svc.reactivate_strict(&seeded_tenant.id, &b).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EntityNotDeleted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_soft_deletes_have_one_winner() {
    for _ in 0..20 {
        let (repo, tenants, _) = seeded(&["Contested"]).await;
        let svc = Arc::new(open_service(repo.clone()));
        let id = tenants[0].id;
        let actors: Vec<EntityId> = (0..8).map(|_| new_id()).collect();

        let handles = actors.iter().map(|actor| {
            let svc = svc.clone();
            let actor = *actor;
            tokio::spawn(async move { (actor, svc.soft_delete(&id, &actor).await.unwrap()) })
        });
        let results: Vec<(EntityId, bool)> = join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let winners: Vec<EntityId> = results.iter().filter(|(_, won)| *won).map(|(a, _)| *a).collect();
        assert_eq!(winners.len(), 1);

        let stored = repo.find_deleted(&id).await.unwrap().unwrap();
        assert_eq!(stored.lifecycle().deleted_by(), Some(winners[0]));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_strict_deletes_surface_typed_losers() {
    let (repo, tenants, _) = seeded(&["Contested"]).await;
    let svc = Arc::new(open_service(repo));
    let id = tenants[0].id;

    let handles = (0..6).map(|_| {
        let svc = svc.clone();
        tokio::spawn(async move { svc.soft_delete_strict(&id, &new_id()).await })
    });
    let results: Vec<_> = join_all(handles).await.into_iter().map(|r| r.unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for err in results.into_iter().filter_map(Result::err) {
        assert!(matches!(
            err.kind(),
            ErrorKind::EntityAlreadyDeleted | ErrorKind::ConcurrentModification
        ));
    }
}

#[tokio::test]
async fn bulk_soft_delete_counts_only_transitions() {
    let (repo, tenants, _) = seeded(&["Alpha", "Bravo"]).await;
    let svc = open_service(repo.clone());
    let active = tenants[0].id;
    let inactive = tenants[1].id;
    let missing = new_id();
    let actor = new_id();

    svc.soft_delete(&inactive, &actor).await.unwrap();
    let inactive_before = repo.find_including_deleted(&inactive).await.unwrap().unwrap();

    let count = svc.bulk_soft_delete(&[active, inactive, missing], &new_id()).await.unwrap();
    assert_eq!(count, 1);

    assert!(svc.is_deleted(&active).await.unwrap());
    let inactive_after = repo.find_including_deleted(&inactive).await.unwrap().unwrap();
    assert_eq!(inactive_after.lifecycle(), inactive_before.lifecycle());
    assert!(repo.find_including_deleted(&missing).await.unwrap().is_none());
}

#[tokio::test]
async fn bulk_reactivate_counts_only_transitions() {
    let (repo, tenants, _) = seeded(&["Alpha", "Bravo"]).await;
    let svc = open_service(repo.clone());
    let inactive = tenants[0].id;
    let active = tenants[1].id;
    let missing = new_id();
    let restorer = new_id();

    svc.soft_delete(&inactive, &new_id()).await.unwrap();
    let active_before = repo.find_including_deleted(&active).await.unwrap().unwrap();

    let count = svc.bulk_reactivate(&[inactive, active, missing], &restorer).await.unwrap();
    assert_eq!(count, 1);

    let restored = repo.find_active(&inactive).await.unwrap().unwrap();
    assert!(restored.lifecycle().deleted_at().is_none());
    assert_eq!(restored.lifecycle().updated_by(), Some(restorer));

    let active_after = repo.find_including_deleted(&active).await.unwrap().unwrap();
    assert_eq!(active_after.lifecycle(), active_before.lifecycle());
    assert!(repo.find_including_deleted(&missing).await.unwrap().is_none());
    assert_coupling(&repo).await;
}

#[tokio::test]
async fn bulk_reactivate_permission_gate_leaves_batch_untouched() {
    let (repo, tenants, _) = seeded(&["Alpha", "Bravo"]).await;
    let admin = new_id();
    let guest = new_id();
    let policy = RoleBasedPolicy::new().with_role(admin, ActorRole::Admin);
    let svc = SoftDeleteService::new(repo.clone(), Arc::new(policy), Arc::new(NoDependents));
    let ids: Vec<EntityId> = tenants.iter().map(|t| t.id).collect();

    assert_eq!(svc.bulk_soft_delete(&ids, &admin).await.unwrap(), 2);

    let err = svc.bulk_reactivate(&ids, &guest).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientPermissions);
    assert_eq!(repo.count_deleted().await.unwrap(), 2);

    assert_eq!(svc.bulk_reactivate(&ids, &admin).await.unwrap(), 2);
}

#[tokio::test]
async fn default_reads_hide_deleted_records() {
    let (repo, tenants, _) = seeded(&["Alpha", "Bravo"]).await;
    let svc = open_service(repo.clone());
    let gone = tenants[0].id;
    let kept = tenants[1].id;
    let admin = new_id();

    svc.soft_delete(&gone, &admin).await.unwrap();

    let active: Vec<EntityId> = svc.find_all_active().await.unwrap().iter().map(|t| t.id).collect();
    assert_eq!(active, vec![kept]);
    assert!(svc.find_active_by_id(&gone).await.unwrap().is_none());
    assert!(!svc.exists_and_active(&gone).await.unwrap());

    let deleted: Vec<EntityId> = svc.find_all_deleted(&admin).await.unwrap().iter().map(|t| t.id).collect();
    assert_eq!(deleted, vec![gone]);

    let all = repo.find_all_including_deleted().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(svc.find_including_deleted(&gone, &admin).await.unwrap().is_some());

    assert_eq!(svc.count_active().await.unwrap(), 1);
    assert_eq!(svc.count_deleted(&admin).await.unwrap(), 1);
}

#[tokio::test]
async fn audit_queries_filter_by_actor_and_time() {
    let (repo, tenants, _) = seeded(&["Alpha", "Bravo", "Charlie"]).await;
    let svc = open_service(repo);
    let alice = new_id();
    let bob = new_id();
    let auditor = new_id();
    let start = Utc::now() - Duration::seconds(1);

    svc.soft_delete(&tenants[0].id, &alice).await.unwrap();
    svc.soft_delete(&tenants[1].id, &bob).await.unwrap();
    svc.soft_delete(&tenants[2].id, &alice).await.unwrap();
    svc.reactivate(&tenants[2].id, &bob).await.unwrap();

    let by_alice = svc.find_deleted_by_actor(&alice, &auditor).await.unwrap();
    assert_eq!(by_alice.len(), 1);
    assert_eq!(by_alice[0].id, tenants[0].id);

    let window = svc
        .find_deleted_between(start, Utc::now() + Duration::seconds(1), &auditor)
        .await
        .unwrap();
    assert_eq!(window.len(), 2);

    let before = svc
        .find_deleted_between(start - Duration::hours(2), start - Duration::hours(1), &auditor)
        .await
        .unwrap();
    assert!(before.is_empty());
}

#[tokio::test]
async fn permission_gate_leaves_entity_untouched() {
    let (repo, tenants, _) = seeded(&["Alpha"]).await;
    let admin = new_id();
    let guest = new_id();
    let policy = RoleBasedPolicy::new().with_role(admin, ActorRole::Admin);
    let svc = SoftDeleteService::new(repo.clone(), Arc::new(policy), Arc::new(NoDependents));
    let id = tenants[0].id;
    let before = repo.find_including_deleted(&id).await.unwrap().unwrap();

    assert!(!svc.can_soft_delete(&id, &guest).await);
    let err = svc.soft_delete(&id, &guest).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientPermissions);

    let after = repo.find_including_deleted(&id).await.unwrap().unwrap();
    assert_eq!(after.lifecycle(), before.lifecycle());

    let err = svc.find_all_deleted(&guest).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientPermissions);

    assert!(svc.can_reactivate(&id, &admin).await);
    assert!(svc.soft_delete(&id, &admin).await.unwrap());
}

#[tokio::test]
async fn active_client_apps_block_tenant_deletion() {
    let tenants = Arc::new(InMemorySoftDeleteRepository::<Tenant>::new());
    let apps = Arc::new(InMemorySoftDeleteRepository::<ClientApp>::new());
    let actor = new_id();

    let busy = tenants.insert(&tenant("Busy", actor)).await.unwrap();
    let idle = tenants.insert(&tenant("Idle", actor)).await.unwrap();
    let app = apps
        .insert(&ClientApp::new(busy.id, "Portal".to_string(), "portal".to_string(), AppType::Web, Some(actor)).unwrap())
        .await
        .unwrap();

    let guard = ActiveChildrenGuard::new(apps.clone(), "client_apps");
    let tenant_svc = SoftDeleteService::new(tenants.clone(), Arc::new(AllowAll), Arc::new(guard));
    let app_svc = SoftDeleteService::new(apps.clone(), Arc::new(AllowAll), Arc::new(NoDependents));

    let err = tenant_svc.soft_delete(&busy.id, &actor).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CascadingConstraintViolation);
    assert_eq!(err.entity_id(), Some(busy.id));
    assert!(tenants.exists_active(&busy.id).await.unwrap());

    // bulk skips the blocked tenant and keeps going
    assert_eq!(tenant_svc.bulk_soft_delete(&[busy.id, idle.id], &actor).await.unwrap(), 1);

    assert!(app_svc.soft_delete(&app.id, &actor).await.unwrap());
    assert!(tenant_svc.soft_delete(&busy.id, &actor).await.unwrap());
}

#[tokio::test]
async fn create_stamps_audit_fields() {
    let repo = Arc::new(InMemorySoftDeleteRepository::<Tenant>::new());
    let svc = open_service(repo.clone());
    let creator = new_id();

    let created = svc
        .create(Tenant::new("Delta".to_string(), "delta".to_string(), 5, SubscriptionPlan::Free, None).unwrap(), &creator)
        .await
        .unwrap();

    assert_eq!(created.lifecycle().created_by(), Some(creator));
    assert!(svc.exists_and_active(&created.id).await.unwrap());
}
