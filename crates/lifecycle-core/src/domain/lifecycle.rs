// ============================================================================
// Lifecycle Core - Lifecycle State
// File: crates/lifecycle-core/src/domain/lifecycle.rs
// Description: Embedded lifecycle/audit state and the capability traits over it
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lifecycle_shared::{advance_timestamp, EntityId};

use super::status::EntityStatus;

/// Lifecycle and audit metadata embedded by value in every domain record.
///
/// Holds `status == Active` exactly when `deleted_at` and `deleted_by` are both
/// `None`. Only the transition methods below touch the deletion fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleState {
    status: EntityStatus,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<EntityId>,
    created_at: DateTime<Utc>,
    created_by: Option<EntityId>,
    updated_at: DateTime<Utc>,
    updated_by: Option<EntityId>,
}

impl LifecycleState {
    /// Fresh active state created at `at` by `created_by`.
    pub fn new_at(created_by: Option<EntityId>, at: DateTime<Utc>) -> Self {
        Self {
            status: EntityStatus::Active,
            deleted_at: None,
            deleted_by: None,
            created_at: at,
            created_by,
            updated_at: at,
            updated_by: created_by,
        }
    }

    pub fn new(created_by: Option<EntityId>) -> Self {
        Self::new_at(created_by, Utc::now())
    }

    /// Rebuilds state loaded from storage. Rejects rows whose status and
    /// deletion fields disagree.
    pub fn restore(
        status: EntityStatus,
        deleted_at: Option<DateTime<Utc>>,
        deleted_by: Option<EntityId>,
        created_at: DateTime<Utc>,
        created_by: Option<EntityId>,
        updated_at: DateTime<Utc>,
        updated_by: Option<EntityId>,
    ) -> Option<Self> {
        let state = Self {
            status,
            deleted_at,
            deleted_by,
            created_at,
            created_by,
            updated_at,
            updated_by,
        };
        state.check_invariants().then_some(state)
    }

    pub fn status(&self) -> EntityStatus {
        self.status
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn deleted_by(&self) -> Option<EntityId> {
        self.deleted_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> Option<EntityId> {
        self.created_by
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn updated_by(&self) -> Option<EntityId> {
        self.updated_by
    }

    pub fn is_active(&self) -> bool {
        self.status == EntityStatus::Active
    }

    pub fn is_deleted(&self) -> bool {
        self.status == EntityStatus::Inactive
    }

    /// Status/audit coupling: active iff neither deletion field is set.
    pub fn check_invariants(&self) -> bool {
        let active = self.is_active();
        active == self.deleted_at.is_none()
            && active == self.deleted_by.is_none()
            && self.updated_at >= self.created_at
    }

    /// Active -> Inactive. Returns `false` and changes nothing when already inactive.
    pub fn deactivate_at(&mut self, actor: EntityId, at: DateTime<Utc>) -> bool {
        if self.is_deleted() {
            return false;
        }
        self.status = EntityStatus::Inactive;
        self.deleted_at = Some(at);
        self.deleted_by = Some(actor);
        self.stamp_updated_at(actor, at);
        true
    }

    pub fn deactivate(&mut self, actor: EntityId) -> bool {
        self.deactivate_at(actor, Utc::now())
    }

    /// Inactive -> Active. Returns `false` and changes nothing when already active.
    pub fn reactivate_at(&mut self, actor: EntityId, at: DateTime<Utc>) -> bool {
        if self.is_active() {
            return false;
        }
        self.status = EntityStatus::Active;
        self.deleted_at = None;
        self.deleted_by = None;
        self.stamp_updated_at(actor, at);
        true
    }

    pub fn reactivate(&mut self, actor: EntityId) -> bool {
        self.reactivate_at(actor, Utc::now())
    }

    /// Creation audit; `created_at` is fixed at construction and left alone.
    pub fn stamp_created(&mut self, actor: EntityId) {
        self.created_by = Some(actor);
        self.updated_by = Some(actor);
    }

    pub fn stamp_updated_at(&mut self, actor: EntityId, at: DateTime<Utc>) {
        self.updated_at = advance_timestamp(self.updated_at, at);
        self.updated_by = Some(actor);
    }

    pub fn stamp_updated(&mut self, actor: EntityId) {
        self.stamp_updated_at(actor, Utc::now());
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Identity capability.
pub trait Entity {
    fn id(&self) -> EntityId;
}

/// "Has lifecycle state" capability. Provided methods forward to the embedded state.
pub trait HasLifecycle {
    fn lifecycle(&self) -> &LifecycleState;
    fn lifecycle_mut(&mut self) -> &mut LifecycleState;

    fn status(&self) -> EntityStatus {
        self.lifecycle().status()
    }

    fn is_active(&self) -> bool {
        self.lifecycle().is_active()
    }

    fn is_deleted(&self) -> bool {
        self.lifecycle().is_deleted()
    }

    fn deactivate(&mut self, actor: EntityId) -> bool {
        self.lifecycle_mut().deactivate(actor)
    }

    fn reactivate(&mut self, actor: EntityId) -> bool {
        self.lifecycle_mut().reactivate(actor)
    }

    fn stamp_created(&mut self, actor: EntityId) {
        self.lifecycle_mut().stamp_created(actor)
    }

    fn stamp_updated(&mut self, actor: EntityId) {
        self.lifecycle_mut().stamp_updated(actor)
    }
}

/// Everything the repository and service layers need from a record.
pub trait SoftDeletable: Entity + HasLifecycle + Clone + Send + Sync + 'static {}

impl<T> SoftDeletable for T where T: Entity + HasLifecycle + Clone + Send + Sync + 'static {}

/// Records owned by a parent record; used by dependency guards.
pub trait ChildOf {
    fn parent_id(&self) -> EntityId;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lifecycle_shared::new_id;

    #[test]
    fn test_new_state_is_active() {
        let creator = new_id();
        let state = LifecycleState::new(Some(creator));
        assert!(state.is_active());
        assert!(state.check_invariants());
        assert_eq!(state.created_by(), Some(creator));
        assert_eq!(state.created_at(), state.updated_at());
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let mut state = LifecycleState::new(None);
        let actor = new_id();
        let t1 = Utc::now();

        assert!(state.deactivate_at(actor, t1));
        let snapshot = state.clone();

        assert!(!state.deactivate_at(new_id(), t1 + Duration::seconds(10)));
        assert_eq!(state, snapshot);
        assert_eq!(state.deleted_by(), Some(actor));
        assert!(state.check_invariants());
    }

    #[test]
    fn test_round_trip_keeps_creation_audit() {
        let creator = new_id();
        let remover = new_id();
        let restorer = new_id();
        let mut state = LifecycleState::new(Some(creator));
        let created_at = state.created_at();

        state.deactivate(remover);
        assert!(state.is_deleted());
        assert!(state.check_invariants());

        state.reactivate(restorer);
        assert!(state.is_active());
        assert!(state.deleted_at().is_none());
        assert!(state.deleted_by().is_none());
        assert_eq!(state.updated_by(), Some(restorer));
        assert_eq!(state.created_at(), created_at);
        assert_eq!(state.created_by(), Some(creator));
    }

    #[test]
    fn test_updated_at_strictly_increases() {
        let at = Utc::now();
        let mut state = LifecycleState::new_at(None, at);
        let actor = new_id();

        state.deactivate_at(actor, at);
        let after_delete = state.updated_at();
        assert!(after_delete > at);

        // clock went backwards
        state.reactivate_at(actor, at - Duration::seconds(30));
        assert!(state.updated_at() > after_delete);
    }

    #[test]
    fn test_restore_rejects_inconsistent_rows() {
        let now = Utc::now();
        let broken = LifecycleState::restore(
            EntityStatus::Active,
            Some(now),
            None,
            now,
            None,
            now,
            None,
        );
        assert!(broken.is_none());

        let deleted = LifecycleState::restore(
            EntityStatus::Inactive,
            Some(now),
            Some(new_id()),
            now,
            None,
            now,
            None,
        );
        assert!(deleted.is_some());
    }
}
