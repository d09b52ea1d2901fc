//! Soft-delete repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lifecycle_shared::EntityId;

use crate::domain::SoftDeletable;
use crate::error::SoftDeleteError;

/// Storage boundary for one soft-deletable record type.
///
/// Reads without `deleted`/`including_deleted` in their name return active
/// records only. Every mutation is a single atomic statement guarded by the
/// expected prior status and reports how many rows actually transitioned;
/// `0` covers "missing", "already in the target state" and "lost a race".
#[async_trait]
pub trait SoftDeleteRepository<T: SoftDeletable>: Send + Sync {
    async fn insert(&self, entity: &T) -> Result<T, SoftDeleteError>;

    async fn find_active(&self, id: &EntityId) -> Result<Option<T>, SoftDeleteError>;
    async fn find_all_active(&self) -> Result<Vec<T>, SoftDeleteError>;

    async fn find_deleted(&self, id: &EntityId) -> Result<Option<T>, SoftDeleteError>;
    async fn find_all_deleted(&self) -> Result<Vec<T>, SoftDeleteError>;

    async fn find_including_deleted(&self, id: &EntityId) -> Result<Option<T>, SoftDeleteError>;
    async fn find_all_including_deleted(&self) -> Result<Vec<T>, SoftDeleteError>;

    async fn exists_active(&self, id: &EntityId) -> Result<bool, SoftDeleteError>;

    /// ACTIVE -> INACTIVE when the row is currently ACTIVE; returns 0 or 1.
    async fn deactivate_by_id(
        &self,
        id: &EntityId,
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError>;

    /// INACTIVE -> ACTIVE when the row is currently INACTIVE; returns 0 or 1.
    async fn reactivate_by_id(
        &self,
        id: &EntityId,
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError>;

    async fn deactivate_by_ids(
        &self,
        ids: &[EntityId],
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError>;

    async fn reactivate_by_ids(
        &self,
        ids: &[EntityId],
        at: DateTime<Utc>,
        actor: &EntityId,
    ) -> Result<u64, SoftDeleteError>;

    async fn count_active(&self) -> Result<u64, SoftDeleteError>;
    async fn count_deleted(&self) -> Result<u64, SoftDeleteError>;

    async fn find_deleted_by_actor(&self, actor: &EntityId) -> Result<Vec<T>, SoftDeleteError>;

    /// Inactive records with `start <= deleted_at <= end`.
    async fn find_deleted_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<T>, SoftDeleteError>;
}
