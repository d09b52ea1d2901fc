//! Cascading-constraint port

use async_trait::async_trait;

use lifecycle_shared::EntityId;

use crate::error::SoftDeleteError;

/// Reports active dependents that block deactivation of a record.
///
/// The count is read in its own statement before the conditional update, so
/// the check is best-effort: a dependent created or reactivated between the
/// two can still end up active under an inactive parent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DependencyGuard: Send + Sync {
    /// Number of active records that depend on `id`.
    async fn active_dependents(&self, id: &EntityId) -> Result<u64, SoftDeleteError>;

    /// Label used in violation messages, e.g. `"client_apps"`.
    fn dependent_kind(&self) -> &'static str {
        "dependents"
    }
}

/// For record types nothing depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDependents;

#[async_trait]
impl DependencyGuard for NoDependents {
    async fn active_dependents(&self, _id: &EntityId) -> Result<u64, SoftDeleteError> {
        Ok(0)
    }
}
