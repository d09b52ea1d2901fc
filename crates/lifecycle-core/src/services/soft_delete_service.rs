// ============================================================================
// Lifecycle Core - Soft Delete Service
// File: crates/lifecycle-core/src/services/soft_delete_service.rs
// ============================================================================
//! Lifecycle orchestration: validation, authorization, dependency checks and
//! audit stamping around the repository's conditional statements.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use lifecycle_shared::config::LifecycleSettings;
use lifecycle_shared::{is_absent, EntityId};

use crate::domain::{Entity, HasLifecycle, SoftDeletable};
use crate::error::SoftDeleteError;
use crate::policy::{DependencyGuard, LifecyclePolicy};
use crate::repositories::SoftDeleteRepository;

/// The entry point application code uses for lifecycle transitions and
/// lifecycle-aware reads of one record type.
///
/// `soft_delete`/`reactivate` report "not found" and "already in the target
/// state" as `Ok(false)`. The `*_strict` variants raise the typed error
/// instead and detect races as `ConcurrentModification`.
pub struct SoftDeleteService<T, R, P, G>
where
    T: SoftDeletable,
    R: SoftDeleteRepository<T>,
    P: LifecyclePolicy,
    G: DependencyGuard,
{
    repo: Arc<R>,
    policy: Arc<P>,
    guard: Arc<G>,
    settings: LifecycleSettings,
    _entity: PhantomData<fn() -> T>,
}

impl<T, R, P, G> SoftDeleteService<T, R, P, G>
where
    T: SoftDeletable,
    R: SoftDeleteRepository<T>,
    P: LifecyclePolicy,
    G: DependencyGuard,
{
    pub fn new(repo: Arc<R>, policy: Arc<P>, guard: Arc<G>) -> Self {
        Self {
            repo,
            policy,
            guard,
            settings: LifecycleSettings::default(),
            _entity: PhantomData,
        }
    }

    pub fn with_settings(mut self, settings: LifecycleSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    /// Stamp creation audit and persist a new record.
    pub async fn create(&self, mut entity: T, actor: &EntityId) -> Result<T, SoftDeleteError> {
        require_actor(actor, Some(entity.id()))?;
        entity.stamp_created(*actor);
        let created = self.repo.insert(&entity).await?;
        info!("Entity {} created by {}", created.id(), actor);
        Ok(created)
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Soft delete one record. `Ok(false)` when it does not exist or is already inactive.
    ///
    /// Active dependents fail the call with `CascadingConstraintViolation`. That
    /// check runs before the update and is not atomic with it (see [`DependencyGuard`]).
    pub async fn soft_delete(&self, id: &EntityId, actor: &EntityId) -> Result<bool, SoftDeleteError> {
        require_id(id)?;
        require_actor(actor, Some(*id))?;
        self.authorize_soft_delete(id, actor).await?;
        self.ensure_no_active_dependents(id).await?;

        let affected = self.repo.deactivate_by_id(id, Utc::now(), actor).await?;
        if affected == 0 {
            debug!("Soft delete of {} by {} was a no-op", id, actor);
        } else {
            info!("Entity {} soft deleted by {}", id, actor);
        }
        Ok(affected > 0)
    }

    /// Soft delete one record, failing with `EntityNotFound`, `EntityAlreadyDeleted`
    /// or `ConcurrentModification` instead of reporting a no-op.
    pub async fn soft_delete_strict(&self, id: &EntityId, actor: &EntityId) -> Result<(), SoftDeleteError> {
        require_id(id)?;
        require_actor(actor, Some(*id))?;
        self.authorize_soft_delete(id, actor).await?;

        let current = self
            .repo
            .find_including_deleted(id)
            .await?
            .ok_or_else(|| SoftDeleteError::entity_not_found(*id))?;
        if current.is_deleted() {
            return Err(SoftDeleteError::entity_already_deleted(*id));
        }
        self.ensure_no_active_dependents(id).await?;

        let affected = self.repo.deactivate_by_id(id, Utc::now(), actor).await?;
        if affected == 0 {
            warn!("Entity {} changed between read and soft delete by {}", id, actor);
            return Err(SoftDeleteError::concurrent_modification(*id));
        }

        info!("Entity {} soft deleted by {}", id, actor);
        Ok(())
    }

    /// Soft delete a batch. Missing or already inactive ids and ids with active
    /// dependents are skipped; the result counts rows actually transitioned.
    /// Any id the actor may not delete fails the whole call before the store is touched.
    pub async fn bulk_soft_delete(&self, ids: &[EntityId], actor: &EntityId) -> Result<u64, SoftDeleteError> {
        require_actor(actor, None)?;
        let ids = self.normalize_batch(ids)?;

        for id in &ids {
            self.authorize_soft_delete(id, actor).await?;
        }

        let mut eligible = Vec::with_capacity(ids.len());
        for id in ids {
            let dependents = self.guard.active_dependents(&id).await?;
            if dependents > 0 {
                warn!(
                    "Skipping {} in bulk soft delete: {} active {}",
                    id,
                    dependents,
                    self.guard.dependent_kind()
                );
                continue;
            }
            eligible.push(id);
        }

        if eligible.is_empty() {
            return Ok(0);
        }

        let affected = self.repo.deactivate_by_ids(&eligible, Utc::now(), actor).await?;
        info!("Bulk soft delete by {}: {} of {} requested", actor, affected, eligible.len());
        Ok(affected)
    }

    /// Reactivate one record. `Ok(false)` when it does not exist or is already active.
    pub async fn reactivate(&self, id: &EntityId, actor: &EntityId) -> Result<bool, SoftDeleteError> {
        require_id(id)?;
        require_actor(actor, Some(*id))?;
        self.authorize_reactivate(id, actor).await?;

        let affected = self.repo.reactivate_by_id(id, Utc::now(), actor).await?;
        if affected == 0 {
            debug!("Reactivation of {} by {} was a no-op", id, actor);
        } else {
            info!("Entity {} reactivated by {}", id, actor);
        }
        Ok(affected > 0)
    }

    /// Reactivate one record, failing with `EntityNotFound`, `EntityNotDeleted`
    /// or `ConcurrentModification` instead of reporting a no-op.
    pub async fn reactivate_strict(&self, id: &EntityId, actor: &EntityId) -> Result<(), SoftDeleteError> {
        require_id(id)?;
        require_actor(actor, Some(*id))?;
        self.authorize_reactivate(id, actor).await?;

        let current = self
            .repo
            .find_including_deleted(id)
            .await?
            .ok_or_else(|| SoftDeleteError::entity_not_found(*id))?;
        if current.is_active() {
            return Err(SoftDeleteError::entity_not_deleted(*id));
        }

        let affected = self.repo.reactivate_by_id(id, Utc::now(), actor).await?;
        if affected == 0 {
            warn!("Entity {} changed between read and reactivation by {}", id, actor);
            return Err(SoftDeleteError::concurrent_modification(*id));
        }

        info!("Entity {} reactivated by {}", id, actor);
        Ok(())
    }

    pub async fn bulk_reactivate(&self, ids: &[EntityId], actor: &EntityId) -> Result<u64, SoftDeleteError> {
        require_actor(actor, None)?;
        let ids = self.normalize_batch(ids)?;

        for id in &ids {
            self.authorize_reactivate(id, actor).await?;
        }

        let affected = self.repo.reactivate_by_ids(&ids, Utc::now(), actor).await?;
        info!("Bulk reactivation by {}: {} of {} requested", actor, affected, ids.len());
        Ok(affected)
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub async fn find_active_by_id(&self, id: &EntityId) -> Result<Option<T>, SoftDeleteError> {
        require_id(id)?;
        self.repo.find_active(id).await
    }

    pub async fn find_all_active(&self) -> Result<Vec<T>, SoftDeleteError> {
        self.repo.find_all_active().await
    }

    pub async fn find_all_deleted(&self, requested_by: &EntityId) -> Result<Vec<T>, SoftDeleteError> {
        self.authorize_view_deleted(requested_by).await?;
        self.repo.find_all_deleted().await
    }

    pub async fn find_deleted_by_actor(
        &self,
        actor: &EntityId,
        requested_by: &EntityId,
    ) -> Result<Vec<T>, SoftDeleteError> {
        require_actor(actor, None)?;
        self.authorize_view_deleted(requested_by).await?;
        self.repo.find_deleted_by_actor(actor).await
    }

    pub async fn find_deleted_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        requested_by: &EntityId,
    ) -> Result<Vec<T>, SoftDeleteError> {
        if start > end {
            return Err(SoftDeleteError::validation(None, "range start must not be after its end"));
        }
        self.authorize_view_deleted(requested_by).await?;
        self.repo.find_deleted_between(start, end).await
    }

    /// Status-agnostic lookup for audit and recovery.
    pub async fn find_including_deleted(
        &self,
        id: &EntityId,
        requested_by: &EntityId,
    ) -> Result<Option<T>, SoftDeleteError> {
        require_id(id)?;
        self.authorize_view_deleted(requested_by).await?;
        self.repo.find_including_deleted(id).await
    }

    pub async fn exists_and_active(&self, id: &EntityId) -> Result<bool, SoftDeleteError> {
        require_id(id)?;
        self.repo.exists_active(id).await
    }

    /// `true` only for a record that exists and is inactive.
    pub async fn is_deleted(&self, id: &EntityId) -> Result<bool, SoftDeleteError> {
        require_id(id)?;
        Ok(self.repo.find_deleted(id).await?.is_some())
    }

    pub async fn count_active(&self) -> Result<u64, SoftDeleteError> {
        self.repo.count_active().await
    }

    pub async fn count_deleted(&self, requested_by: &EntityId) -> Result<u64, SoftDeleteError> {
        self.authorize_view_deleted(requested_by).await?;
        self.repo.count_deleted().await
    }

    // ------------------------------------------------------------------------
    // Authorization predicates
    // ------------------------------------------------------------------------

    pub async fn can_soft_delete(&self, entity_id: &EntityId, user_id: &EntityId) -> bool {
        self.policy.can_soft_delete(entity_id, user_id).await
    }

    pub async fn can_reactivate(&self, entity_id: &EntityId, user_id: &EntityId) -> bool {
        self.policy.can_reactivate(entity_id, user_id).await
    }

    async fn authorize_soft_delete(&self, id: &EntityId, actor: &EntityId) -> Result<(), SoftDeleteError> {
        if self.can_soft_delete(id, actor).await {
            return Ok(());
        }
        warn!("User {} denied soft delete of {}", actor, id);
        Err(SoftDeleteError::insufficient_permissions(Some(*id), *actor))
    }

    async fn authorize_reactivate(&self, id: &EntityId, actor: &EntityId) -> Result<(), SoftDeleteError> {
        if self.can_reactivate(id, actor).await {
            return Ok(());
        }
        warn!("User {} denied reactivation of {}", actor, id);
        Err(SoftDeleteError::insufficient_permissions(Some(*id), *actor))
    }

    async fn authorize_view_deleted(&self, requested_by: &EntityId) -> Result<(), SoftDeleteError> {
        require_actor(requested_by, None)?;
        if self.policy.can_view_deleted(requested_by).await {
            return Ok(());
        }
        warn!("User {} denied access to deleted records", requested_by);
        Err(SoftDeleteError::insufficient_permissions(None, *requested_by))
    }

    async fn ensure_no_active_dependents(&self, id: &EntityId) -> Result<(), SoftDeleteError> {
        let dependents = self.guard.active_dependents(id).await?;
        if dependents == 0 {
            return Ok(());
        }
        Err(SoftDeleteError::cascading_constraint_violation(
            *id,
            format!("{} active {} still reference it", dependents, self.guard.dependent_kind()),
        ))
    }

    /// Rejects empty, oversized or nil-bearing batches and drops duplicate ids.
    fn normalize_batch(&self, ids: &[EntityId]) -> Result<Vec<EntityId>, SoftDeleteError> {
        if ids.is_empty() {
            return Err(SoftDeleteError::validation(None, "ids must not be empty"));
        }
        if let Some(pos) = ids.iter().position(is_absent) {
            return Err(SoftDeleteError::validation(None, format!("id at position {} is missing", pos)));
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<EntityId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        if unique.len() > self.settings.max_batch_size {
            return Err(SoftDeleteError::validation(
                None,
                format!(
                    "batch of {} ids exceeds the limit of {}",
                    unique.len(),
                    self.settings.max_batch_size
                ),
            ));
        }
        Ok(unique)
    }
}

fn require_id(id: &EntityId) -> Result<(), SoftDeleteError> {
    if is_absent(id) {
        return Err(SoftDeleteError::validation(None, "entity id is required"));
    }
    Ok(())
}

fn require_actor(actor: &EntityId, entity_id: Option<EntityId>) -> Result<(), SoftDeleteError> {
    if is_absent(actor) {
        return Err(SoftDeleteError::validation(entity_id, "actor id is required"));
    }
    Ok(())
}
