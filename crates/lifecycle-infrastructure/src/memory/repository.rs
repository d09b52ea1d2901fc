// ============================================================================
// Lifecycle Infrastructure - In-Memory Soft Delete Repository
// File: crates/lifecycle-infrastructure/src/memory/repository.rs
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use lifecycle_core::domain::{Entity, EntityStatus, HasLifecycle, SoftDeletable};
use lifecycle_core::error::SoftDeleteError;
use lifecycle_core::repositories::{SoftDeleteRepository, StatusScope};
use lifecycle_shared::EntityId;

/// Process-local store. Each conditional transition checks and applies the
/// status guard under one write lock, so concurrent callers see either the
/// old or the new state of a row and never a partial one.
pub struct InMemorySoftDeleteRepository<T: SoftDeletable> {
    rows: RwLock<HashMap<EntityId, T>>,
}

impl<T: SoftDeletable> InMemorySoftDeleteRepository<T> {
    pub fn new() -> Self {
        Self { rows: RwLock::new(HashMap::new()) }
    }

    /// Snapshot of the rows admitted by `scope` that also satisfy `filter`,
    /// oldest first.
    pub fn select<F>(&self, scope: StatusScope, filter: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let rows = self.rows.read();
        let mut out: Vec<T> = rows
            .values()
            .filter(|row| scope.admits(*row) && filter(*row))
            .cloned()
            .collect();
        out.sort_by_key(|row| (row.lifecycle().created_at(), row.id()));
        out
    }

    pub fn count<F>(&self, scope: StatusScope, filter: F) -> u64
    where
        F: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .values()
            .filter(|row| scope.admits(*row) && filter(*row))
            .count() as u64
    }

    fn find_in(&self, id: &EntityId, scope: StatusScope) -> Option<T> {
        self.rows
            .read()
            .get(id)
            .filter(|row| scope.admits(*row))
            .cloned()
    }

    /// Applies `transition` to every listed row currently in `expected`, all
    /// under a single write lock.
    fn transition<F>(&self, ids: &[EntityId], expected: EntityStatus, mut transition: F) -> u64
    where
        F: FnMut(&mut T) -> bool,
    {
        let mut rows = self.rows.write();
        let mut affected = 0;
        for id in ids {
            if let Some(row) = rows.get_mut(id) {
                if row.status() == expected && transition(row) {
                    affected += 1;
                }
            }
        }
        affected
    }
}

impl<T: SoftDeletable> Default for InMemorySoftDeleteRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: SoftDeletable> SoftDeleteRepository<T> for InMemorySoftDeleteRepository<T> {
    async fn insert(&self, entity: &T) -> Result<T, SoftDeleteError> {
        if !entity.lifecycle().check_invariants() {
            return Err(SoftDeleteError::validation(
                Some(entity.id()),
                "lifecycle status and deletion fields disagree",
            ));
        }

        let mut rows = self.rows.write();
        if rows.contains_key(&entity.id()) {
            return Err(SoftDeleteError::validation(Some(entity.id()), "id is already in use"));
        }
        rows.insert(entity.id(), entity.clone());
        debug!("Inserted entity {}", entity.id());
        Ok(entity.clone())
    }

    async fn find_active(&self, id: &EntityId) -> Result<Option<T>, SoftDeleteError> {
        Ok(self.find_in(id, StatusScope::Active))
    }

    async fn find_all_active(&self) -> Result<Vec<T>, SoftDeleteError> {
        Ok(self.select(StatusScope::Active, |_| true))
    }

    async fn find_deleted(&self, id: &EntityId) -> Result<Option<T>, SoftDeleteError> {
        Ok(self.find_in(id, StatusScope::Deleted))
    }

    async fn find_all_deleted(&self) -> Result<Vec<T>, SoftDeleteError> {
        Ok(self.select(StatusScope::Deleted, |_| true))
    }

    async fn find_including_deleted(&self, id: &EntityId) -> Result<Option<T>, SoftDeleteError> {
        Ok(self.find_in(id, StatusScope::All))
    }

    async fn find_all_including_deleted(&self) -> Result<Vec<T>, SoftDeleteError> {
        Ok(self.select(StatusScope::All, |_| true))
    }

    async fn exists_active(&self, id: &EntityId) -> Result<bool, SoftDeleteError> {
        Ok(self.find_in(id, StatusScope::Active).is_some())
    }

    async fn deactivate_by_id(
        &self,
        id: &EntityId,
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError> {
        self.deactivate_by_ids(std::slice::from_ref(id), at, actor).await
    }

    async fn reactivate_by_id(
        &self,
        id: &EntityId,
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError> {
        self.reactivate_by_ids(std::slice::from_ref(id), at, actor).await
    }

    async fn deactivate_by_ids(
        &self,
        ids: &[EntityId],
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError> {
        Ok(self.transition(ids, EntityStatus::Active, |row| {
            row.lifecycle_mut().deactivate_at(*actor, at)
        }))
    }

    async fn reactivate_by_ids(
        &self,
        ids: &[EntityId],
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError> {
        Ok(self.transition(ids, EntityStatus::Inactive, |row| {
            row.lifecycle_mut().reactivate_at(*actor, at)
        }))
    }

    async fn count_active(&self) -> Result<u64, SoftDeleteError> {
        Ok(self.count(StatusScope::Active, |_| true))
    }

    async fn count_deleted(&self) -> Result<u64, SoftDeleteError> {
        Ok(self.count(StatusScope::Deleted, |_| true))
    }

    async fn find_deleted_by_actor(&self, actor: &EntityId) -> Result<Vec<T>, SoftDeleteError> {
        Ok(self.select(StatusScope::Deleted, |row| {
            row.lifecycle().deleted_by() == Some(*actor)
        }))
    }

    async fn find_deleted_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<T>, SoftDeleteError> {
        Ok(self.select(StatusScope::Deleted, |row| {
            row.lifecycle()
                .deleted_at()
                .map_or(false, |at| start <= at && at <= end)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lifecycle_core::domain::{SubscriptionPlan, Tenant};
    use lifecycle_shared::new_id;

    fn tenant(name: &str) -> Tenant {
        Tenant::new(name.to_string(), name.to_lowercase(), 10, SubscriptionPlan::Free, None).unwrap()
    }

    #[tokio::test]
    async fn test_conditional_deactivate() {
        let repo = InMemorySoftDeleteRepository::<Tenant>::new();
        let t = repo.insert(&tenant("Alpha")).await.unwrap();
        let actor = new_id();
        let now = Utc::now();

        assert_eq!(repo.deactivate_by_id(&t.id, now, &actor).await.unwrap(), 1);
        assert_eq!(repo.deactivate_by_id(&t.id, now, &new_id()).await.unwrap(), 0);
        assert_eq!(repo.deactivate_by_id(&new_id(), now, &actor).await.unwrap(), 0);

        let stored = repo.find_deleted(&t.id).await.unwrap().unwrap();
        assert_eq!(stored.lifecycle().deleted_by(), Some(actor));
        assert_eq!(stored.lifecycle().deleted_at(), Some(now));
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let repo = InMemorySoftDeleteRepository::<Tenant>::new();
        let t = tenant("Alpha");
        repo.insert(&t).await.unwrap();
        assert!(repo.insert(&t).await.is_err());
    }

    #[tokio::test]
    async fn test_deleted_between_is_inclusive() {
        let repo = InMemorySoftDeleteRepository::<Tenant>::new();
        let a = repo.insert(&tenant("Alpha")).await.unwrap();
        let b = repo.insert(&tenant("Bravo")).await.unwrap();
        let actor = new_id();
        let t0 = Utc::now();

        repo.deactivate_by_id(&a.id, t0, &actor).await.unwrap();
        repo.deactivate_by_id(&b.id, t0 + Duration::hours(2), &actor).await.unwrap();

        let hits = repo.find_deleted_between(t0, t0 + Duration::hours(1)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, a.id);

        let hits = repo
            .find_deleted_between(t0, t0 + Duration::hours(2))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_preserves_inactive_state() {
        let repo = InMemorySoftDeleteRepository::<Tenant>::new();
        let mut t = tenant("Alpha");
        t.deactivate(new_id());
        assert!(repo.insert(&t).await.is_ok());
        assert_eq!(repo.count_deleted().await.unwrap(), 1);
    }
}
